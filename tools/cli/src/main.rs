//! tlb: 多级 TLB 地址翻译模拟器命令行

mod args;
mod parse;
mod report;

use log::debug;
use tlbsim_core::Simulator;

fn main() -> anyhow::Result<()> {
    let matches = args::command().get_matches();
    let default_filter = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", default_filter))
        .init();

    let cli = args::resolve(&matches)?;
    debug!("resolved arguments: {:?}", cli);

    println!("{}", report::render_config(&cli.config, &cli.access, &cli.prefetch));

    let mut sim = Simulator::new(cli.config)?;
    let run = sim.run(&cli.prefetch, &cli.access)?;
    for outcome in &run.accesses {
        println!("{}", report::render_access(outcome));
    }

    println!();
    print!("{}", report::render_summary(&run));
    Ok(())
}
