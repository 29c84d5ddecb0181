use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cfg = okhid::config::Config::parse();
    okhid::run(cfg)
}
