use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use model::base_types::VehicleCount;
use rayon::ThreadPoolBuilder;
use runner::instance_converter::{convert_csv_to_json, DEFAULT_STATIONS};
use runner::logging::init_logging;
use solver::SolverOptions;
use structopt::StructOpt;
use tracing::debug;

/// `STATION=N`
#[derive(Debug, Clone)]
struct OvernightCapacity {
    station: String,
    capacity: VehicleCount,
}

impl FromStr for OvernightCapacity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (station, capacity) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected STATION=N, got {}", s))?;
        let capacity = capacity
            .parse()
            .map_err(|e| format!("invalid capacity {}: {}", capacity, e))?;
        Ok(OvernightCapacity {
            station: station.to_string(),
            capacity,
        })
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "fleet_sizing",
    about = "Minimal rolling stock fleet for a periodic timetable"
)]
enum ClArgs {
    /// Computes the cheapest circulation and writes it to <output-dir>/output_<instance>
    Solve {
        #[structopt(parse(from_os_str))]
        instance: PathBuf,
        /// Limits the number of units parked overnight at a station
        #[structopt(long = "overnight-capacity", number_of_values = 1)]
        overnight_capacities: Vec<OvernightCapacity>,
        /// Stops after this many augmentations; the result is then "interrupted"
        #[structopt(long)]
        max_augmentations: Option<usize>,
        #[structopt(long, parse(from_os_str), default_value = "output")]
        output_dir: PathBuf,
        #[structopt(long, parse(from_os_str))]
        log: Option<PathBuf>,
    },
    /// Solves once for every overnight capacity 0..=max-capacity of one station
    Sweep {
        #[structopt(parse(from_os_str))]
        instance: PathBuf,
        #[structopt(long)]
        station: String,
        #[structopt(long)]
        max_capacity: VehicleCount,
        #[structopt(long, short = "c", default_value = "1")]
        threads: usize,
        #[structopt(long, parse(from_os_str), default_value = "output")]
        output_dir: PathBuf,
        #[structopt(long, parse(from_os_str))]
        log: Option<PathBuf>,
    },
    /// Converts a timetable csv into an instance json
    Convert {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(parse(from_os_str))]
        output: PathBuf,
        /// Station names (default: Retiro, Tigre)
        #[structopt(long = "station", number_of_values = 1)]
        stations: Vec<String>,
        /// Passengers per unit
        #[structopt(long, default_value = "200")]
        capacity: u32,
        /// Maximal number of units per service
        #[structopt(long, default_value = "6")]
        max_units: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let args = ClArgs::from_args();

    match args {
        ClArgs::Solve {
            instance,
            overnight_capacities,
            max_augmentations,
            output_dir,
            log,
        } => {
            let _guard = init_logging(log)?;
            debug!(?instance, ?overnight_capacities, ?max_augmentations);
            println!("\n---------- RUN: {} ----------", instance.display());

            let input_data = read_instance(&instance)?;
            let overnight_capacities: Vec<(String, VehicleCount)> = overnight_capacities
                .into_iter()
                .map(|c| (c.station, c.capacity))
                .collect();
            let mut options = SolverOptions::default();
            if let Some(max_augmentations) = max_augmentations {
                options = options.with_max_augmentations(max_augmentations);
            }

            let output = runner::run(&input_data, &overnight_capacities, options)?;
            write_json(&output, &ensure_output_path(&instance, &output_dir, "output")?)
        }
        ClArgs::Sweep {
            instance,
            station,
            max_capacity,
            threads,
            output_dir,
            log,
        } => {
            let _guard = init_logging(log)?;
            ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("cannot build thread pool")?;
            println!("\n---------- SWEEP: {} ----------", instance.display());

            let input_data = read_instance(&instance)?;
            let output =
                runner::sweep(&input_data, &station, max_capacity, SolverOptions::default())?;
            write_json(&output, &ensure_output_path(&instance, &output_dir, "sweep")?)
        }
        ClArgs::Convert {
            input,
            output,
            stations,
            capacity,
            max_units,
        } => {
            let _guard = init_logging(None::<&Path>)?;
            let stations = if stations.is_empty() {
                DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
            } else {
                stations
            };
            let file = File::open(&input)
                .with_context(|| format!("cannot open {}", input.display()))?;
            let json = convert_csv_to_json(BufReader::new(file), &stations, capacity, max_units)
                .with_context(|| format!("cannot convert {}", input.display()))?;
            write_json(&json, &output)
        }
    }
}

fn read_instance(path: &Path) -> anyhow::Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut input_data = String::new();
    file.read_to_string(&mut input_data)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Ok(input_data)
}

fn write_json(json: &serde_json::Value, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, json)?;
    println!("output written to {}", path.display());
    Ok(())
}

/// `<output_dir>/<prefix>_<instance file name>`; creates the directory if needed
fn ensure_output_path(
    input_path: &Path,
    output_dir: &Path,
    prefix: &str,
) -> anyhow::Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no file name", input_path.display()))?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create {}", output_dir.display()))?;
    Ok(output_dir.join(format!("{}_{}", prefix, file_name)))
}
