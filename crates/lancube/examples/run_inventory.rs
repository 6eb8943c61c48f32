use lancube::{InventoryConfig, Recording, SpectralCatalog, Surveyor};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: {} <recording.json> <catalog.json> <instrument_height_m> [out.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let recording = Recording::from_json_file(Path::new(&args[1]))?;
    let catalog = SpectralCatalog::from_json_file(Path::new(&args[2]))?;
    let h: f64 = args[3].parse()?;

    let surveyor = Surveyor::with_config(catalog, InventoryConfig::with_survey(h, 1.0, 8.0));
    let result = surveyor.survey(&recording);

    println!(
        "Found {} fixtures ({} detections built).",
        result.fixtures.len(),
        result.stats.fixtures_built
    );
    for f in &result.fixtures {
        println!(
            "  {:>11.6} {:>11.6}  H={:5.1} m  flux={:8.0}  {:?} {}",
            f.lat, f.lon, f.height_m, f.flux, f.side, f.tech
        );
    }

    if let Some(out_path) = args.get(4) {
        std::fs::write(out_path, result.to_json_string()?)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
