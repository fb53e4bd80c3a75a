use anyhow::Result;
use clap::Parser;

mod annotate;
mod cli;
mod ext;
mod github;
mod location;
mod model;
mod normalize;
mod pipeline;
mod render;
mod report;
mod settings;
mod util;
mod xcresulttool;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI (or action inputs) into one config
  let cfg = normalize(cli)?;

  // Phase 2: load, normalize, emit
  crate::pipeline::run(&cfg)
}
