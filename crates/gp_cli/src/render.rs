//! Console text rendering for results and standings.

use gp_core::api::StandingsJson;
use gp_core::engine::stats::format_time;
use gp_core::RaceRecord;

pub fn print_race(record: &RaceRecord) {
    println!();
    println!("=== {} round {} ({}) ===", record.circuit, record.round, record.series);

    println!();
    println!("Qualifying");
    for (i, row) in record.qualifying.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:<24} {}",
            i + 1,
            row.driver,
            row.team,
            format_time(row.time)
        );
    }
    if !record.dnq.is_empty() {
        println!("  DNQ:");
        for row in &record.dnq {
            println!("      {:<24} {:<24}", row.driver, row.team);
        }
    }

    println!();
    println!("Race");
    for f in &record.finishers {
        println!(
            "  {:>2}. {:<24} {:<24} {}",
            f.position,
            f.driver,
            f.team,
            format_time(f.time)
        );
    }
    for (i, d) in record.dnfs.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:<24} DNF ({})",
            record.finishers.len() + i + 1,
            d.driver,
            d.team,
            d.reason.as_str()
        );
    }

    if let Some((driver, time)) = &record.fastest_lap {
        println!();
        println!("Fastest lap:    {} ({})", driver, format_time(*time));
    }
    if let Some((driver, laps)) = &record.most_laps_led {
        println!("Most laps led:  {} ({})", driver, laps);
    }
    if let Some((driver, gained)) = &record.most_positions_gained {
        println!("Biggest mover:  {} (+{})", driver, gained);
    }
}

pub fn print_standings(snapshot: &StandingsJson) {
    println!();
    println!("=== {} standings ===", snapshot.series);
    println!(
        "  {:>4} {:<24} {:<24} {:>6} {:>4} {:>5} {:>4}",
        "Rank", "Driver", "Team", "Points", "Wins", "Poles", "DNFs"
    );
    for row in &snapshot.drivers {
        println!(
            "  {:>4} {:<24} {:<24} {:>6} {:>4} {:>5} {:>4}",
            row.rank, row.driver, row.team, row.points, row.wins, row.poles, row.dnfs
        );
    }
    println!();
    println!("  Entrants");
    for row in &snapshot.entrants {
        println!(
            "  {:>4} {:<24} {:>6} {:>4}",
            row.rank, row.team, row.points, row.wins
        );
    }
}
