use {diamond_miner::*, std::time::Instant};

/// Solves each blueprint independently: a fresh explorer per blueprint, so no memo table or
/// pruning bound leaks from one solve into the next
fn solve_blueprints(blueprints: &Blueprints, args: &Args) {
    let max_blueprints: usize = args.max_blueprints.unwrap_or(blueprints.len());

    for blueprint in blueprints.iter().take(max_blueprints) {
        let initial_state: SimulationState =
            SimulationState::new(Pack::initial(), args.turns);
        let mut explorer: Explorer = Explorer::new(*blueprint);
        let start: Instant = Instant::now();
        let max_diamonds: u16 = explorer.run(initial_state);
        let duration_millis: u128 = start.elapsed().as_millis();

        println!(
            "Blueprint {}: {} diamonds in {} turns ({}ms)",
            blueprint.id, max_diamonds, args.turns, duration_millis
        );

        if args.verbose {
            let stats: SearchStats = explorer.stats();

            println!(
                "    states visited: {}\n    cache hit rate: {:.2}%\n    futile prunes: {}",
                stats.states_visited,
                100.0_f64 * stats.cache_hit_rate(),
                stats.futile_hits
            );
        }
    }
}

fn main() {
    let args: Args = Args::parse();
    let input_file_path: &str = args.input_file_path("input/blueprints.txt");

    if let Err(err) =
        // SAFETY: This operation is unsafe, we're just hoping nobody else touches the file while
        // this program is executing
        unsafe {
            open_utf8_file(input_file_path, |input: &str| {
                match Blueprints::try_from(input) {
                    Ok(blueprints) => solve_blueprints(&blueprints, &args),
                    Err(error) => eprintln!("Failed to parse blueprints:\n{error:#?}"),
                }
            })
        }
    {
        eprintln!(
            "Encountered error {} when opening file \"{}\"",
            err, input_file_path
        );
    }
}
