use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use flotilla_core::{EntityId, TeamId};
use flotilla_sim::{SimEvent, SimEventKind, Simulation, Snapshot};

/// Arguments of `flotilla simulate`.
pub struct Options<'a> {
    pub config: Option<&'a Path>,
    pub ticks: u64,
    pub dt: f32,
    pub seed: Option<u64>,
    pub capacity: Option<usize>,
    pub verbose: bool,
}

/// Shots and deaths per team over a run.
#[derive(Default, Clone, Copy)]
struct Tally {
    shots: usize,
    deaths: usize,
}

pub fn run(opts: &Options<'_>) -> Result<(), String> {
    if !opts.dt.is_finite() || opts.dt <= 0.0 {
        return Err(format!("--dt must be a positive number of seconds, got {}", opts.dt));
    }

    let mut config = super::load_config(opts.config)?;
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    if let Some(capacity) = opts.capacity {
        config = config.with_per_team_capacity(capacity);
    }

    let mut sim = Simulation::new(config).map_err(|e| format!("simulation init failed: {e}"))?;
    let mut tallies = vec![Tally::default(); sim.teams().len()];
    let mut event_count = 0;

    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
    }
    for _ in 0..opts.ticks {
        sim.tick(opts.dt);
        let snapshot = sim.snapshot();
        let events = sim.drain_events();
        event_count += events.len();
        for event in &events {
            record(&mut tallies, &snapshot, event);
            if opts.verbose {
                let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
                println!("  {tick_label} {}", colorize_event(&event.kind));
            }
        }
    }
    if opts.verbose {
        println!();
    }

    let config = sim.config();
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({} ticks, seed={}, dt={}s)", opts.ticks, config.seed, opts.dt).dimmed()
    );
    println!(
        "  {:.1}s simulated, {event_count} events",
        sim.clock().elapsed_seconds()
    );
    println!();

    let capacity = config.per_team_capacity;
    let teams: Vec<(TeamId, String)> = sim
        .teams()
        .iter()
        .map(|(team, team_config)| (team, team_config.name.clone()))
        .collect();
    let snapshot = sim.shutdown();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Team", "Active", "Capacity", "Mean HP", "Shots", "Deaths"]);
    for (team, name) in teams {
        let tally = tallies.get(team.index()).copied().unwrap_or_default();
        table.add_row(vec![
            name,
            snapshot.active_count(team).to_string(),
            capacity.to_string(),
            mean_health(&snapshot, team),
            tally.shots.to_string(),
            tally.deaths.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}

fn record(tallies: &mut [Tally], snapshot: &Snapshot, event: &SimEvent) {
    match event.kind {
        SimEventKind::ShotFired { shooter, .. } => {
            if let Some(tally) = team_of(snapshot, shooter).and_then(|t| tallies.get_mut(t.index())) {
                tally.shots += 1;
            }
        }
        SimEventKind::EntityDied { team, .. } => {
            if let Some(tally) = tallies.get_mut(team.index()) {
                tally.deaths += 1;
            }
        }
        _ => {}
    }
}

fn team_of(snapshot: &Snapshot, id: EntityId) -> Option<TeamId> {
    id.index().and_then(|i| snapshot.get(i)).map(|e| e.team())
}

fn mean_health(snapshot: &Snapshot, team: TeamId) -> String {
    let (sum, count) = snapshot
        .active()
        .filter(|e| e.team() == team)
        .fold((0.0, 0), |(sum, count), e| (sum + e.health, count + 1));
    if count == 0 {
        "--".to_string()
    } else {
        format!("{:.1}", sum / count as f32)
    }
}

fn colorize_event(kind: &SimEventKind) -> colored::ColoredString {
    let text = kind.to_string();
    match kind {
        SimEventKind::EntityDied { .. } => text.red().bold(),
        SimEventKind::ShotFired { .. } => text.yellow(),
        SimEventKind::TargetAcquired { .. } => text.cyan(),
        SimEventKind::Spawned { .. } => text.green(),
        SimEventKind::PopulationReset => text.blue(),
    }
}
