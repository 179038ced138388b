mod cli;
mod term;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use ron::ser::PrettyConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uttt::Game;

use crate::{cli::Cli, term::Options};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        color: !cli.no_color,
    };

    let mut game = Game::new(cli.first);
    if let Some(path) = &cli.replay {
        game = term::replay(game, path)?;
    }

    let game = if cli.autoplay {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(seed = ?cli.seed, "autoplaying");
        term::autoplay(game, &mut rng, &options)
    } else {
        term::play(game, &options)?
    };

    if cli.dump {
        let snapshot = game.snapshot();
        println!("{}", ron::ser::to_string_pretty(&snapshot, PrettyConfig::new())?);
    }

    Ok(())
}
