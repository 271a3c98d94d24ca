use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use mbmerge::{DEFAULT_BATCH_SIZE, MergeConfig, TilesMerger};
use mbmerge_core::CoveragePolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	arg_required_else_help = true,
	disable_help_subcommand = true,
)]
struct Cli {
	/// destination *.mbtiles file, must not exist yet
	#[arg()]
	output: PathBuf,

	/// source *.mbtiles files; the first one is the base, every further one is drawn on top
	#[arg(required = true, value_name = "INPUT")]
	inputs: Vec<PathBuf>,

	/// number of merged tiles inserted per batch
	#[arg(long, value_name = "int", default_value_t = DEFAULT_BATCH_SIZE as u32, value_parser = clap::value_parser!(u32).range(1..), display_order = 1)]
	batch_size: u32,

	/// which coordinates to merge: those of the base source, or those of any source
	#[arg(long, value_enum, default_value_t = CoveragePolicy::Base, display_order = 1)]
	coverage: CoveragePolicy,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
	eprintln!("merge {:?} into {:?}", cli.inputs, cli.output);

	let config = MergeConfig::from_paths(&cli.output, &cli.inputs)?
		.with_batch_size(cli.batch_size as usize)
		.with_coverage(cli.coverage);
	let summary = TilesMerger::new(config).run()?;

	eprintln!(
		"wrote {} tiles on zoom levels {:?}, skipped {}",
		summary.tiles_written, summary.zoom_levels, summary.tiles_skipped
	);
	Ok(())
}
