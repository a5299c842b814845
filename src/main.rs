use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use nemeion_breeder::{
    BreedingGround, Creature, CreatureInit, Generator, GeneticTable, LitterOrchestrator, Result, RngDice,
};

#[derive(Parser, Debug)]
#[command(name = "nemeion-breeder")]
#[command(about = "Generate Nemeion litters from two parents or at random")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory with genetics.json and/or addons.json overriding the defaults
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON file with { "father": {...}, "mother": {...} }
    #[arg(short, long)]
    parents: Option<PathBuf>,

    /// Generate a random litter even when parents are given
    #[arg(long)]
    random: bool,

    /// Addon identifier (repeatable, applied in order)
    #[arg(short, long = "addon")]
    addons: Vec<String>,

    /// Print the addon catalog and exit
    #[arg(long)]
    list_addons: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Deserialize)]
struct Parents {
    father: Option<CreatureInit>,
    mother: Option<CreatureInit>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let genetics = match &args.data {
        Some(dir) => GeneticTable::load_from(dir)?,
        None => GeneticTable::defaults(),
    };

    if args.list_addons {
        for (id, addon) in genetics.add_ons.iter() {
            match &addon.description {
                Some(description) => println!("{}\t{}\t{}", id, addon.name, description),
                None => println!("{}\t{}", id, addon.name),
            }
        }
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    eprintln!("Seed: {}", seed);
    let mut dice = RngDice::seeded(seed);

    let orchestrator = match &args.parents {
        Some(path) if !args.random => {
            let parents: Parents = serde_json::from_str(&fs::read_to_string(path)?)?;
            let father = parents.father.map(|init| Creature::new(&genetics, init));
            let mother = parents.mother.map(|init| Creature::new(&genetics, init));
            let ground = BreedingGround::from_parents(&genetics, father, mother)?;
            LitterOrchestrator::with_generator(Generator::Breeding(ground))
        }
        _ => LitterOrchestrator::random(&genetics),
    };

    let litter = orchestrator.make_litter(args.addons.as_slice(), &mut dice)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&litter)?
    } else {
        serde_json::to_string(&litter)?
    };
    println!("{}", json);
    Ok(())
}
