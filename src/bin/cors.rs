use lanserve::config::{Config, Variant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::preset(Variant::Cors)?;
    lanserve::run(cfg)?;
    Ok(())
}
