/*!

`geogen` is the command-line front end to `geotheorems`: it parses the
`run` invocation, loads the template library, and drives the runner over
an input directory. Logging is filtered through `GEOGEN_LOG_LEVEL` rather
than a hardcoded level, the same way the teacher leaves its own log level
to the environment.

*/

use std::path::PathBuf;
use std::process;

use env_logger::Env;
use getopts::Options;

use geotheorems::error::ErrorKind;
use geotheorems::runner::{self,RunnerOptions};

fn usage(program:&str, opts:&Options) -> String
{
	let brief = format!("Usage: {} run [options]", program);
	opts.usage(&brief)
}

fn build_options() -> Options
{
	let mut opts = Options::new();
	opts.reqopt("", "inputs", "directory of generator input files", "DIR");
	opts.reqopt("", "templates", "directory of template theorem files", "DIR");
	opts.reqopt("", "output", "directory to write reports into", "DIR");
	opts.reqopt("", "iterations", "maximum construction depth", "N");
	opts.reqopt("", "pictures", "number of pictures per configuration", "K");
	opts.reqopt("", "workers", "number of worker threads (1 for single-threaded)", "P");
	opts.optopt("", "seed", "random seed, default 1", "S");
	opts.optopt("", "output-prefix", "prefix prepended to each report's file name", "P");
	opts.optopt("", "output-ext", "extension appended to each report's file name, default txt", "E");
	opts.optflag("h", "help", "print this help menu");
	opts
}

fn parse_cli(args:&[String]) -> Result<RunnerOptions,i32>
{
	let opts = build_options();
	if args.first().map(String::as_str) != Some("run")
	{
		eprintln!("{}", usage(&args.get(0).cloned().unwrap_or_else(||"geogen".to_string()), &opts));
		return Err(1);
	}
	let matches = match opts.parse(&args[1..])
	{
		Ok(matches) => matches,
		Err(failure) =>
		{
			eprintln!("{}", failure);
			eprintln!("{}", usage("geogen", &opts));
			return Err(1);
		},
	};
	if matches.opt_present("help")
	{
		println!("{}", usage("geogen", &opts));
		return Err(0);
	}

	let parse_usize = |name:&str| -> Result<usize,i32>
	{
		matches.opt_str(name).unwrap().parse::<usize>().map_err(|_|
		{
			eprintln!("--{} must be a non-negative integer", name);
			1
		})
	};

	Ok(RunnerOptions
	{
		inputs: PathBuf::from(matches.opt_str("inputs").unwrap()),
		templates: PathBuf::from(matches.opt_str("templates").unwrap()),
		output: PathBuf::from(matches.opt_str("output").unwrap()),
		iterations: parse_usize("iterations")?,
		pictures: parse_usize("pictures")?,
		workers: parse_usize("workers")?,
		seed: matches.opt_str("seed").map(|s|s.parse::<u64>().unwrap_or(1)).unwrap_or(1),
		output_prefix: matches.opt_str("output-prefix").unwrap_or_default(),
		output_ext: matches.opt_str("output-ext").unwrap_or_else(||"txt".to_string()),
	})
}

///Exit codes of §6: 0 success, 2 input-parse error, 3 template-parse error,
///4 analytic fault during startup, 1 other.
fn exit_code_for(kind:&ErrorKind) -> i32
{
	match kind
	{
		ErrorKind::ParseFailure => 2,
		ErrorKind::AnalyticFailure | ErrorKind::InconsistentPictures | ErrorKind::UnresolvedInconsistency => 4,
		_ => 1,
	}
}

fn main()
{
	env_logger::Builder::from_env(Env::new().filter("GEOGEN_LOG_LEVEL")).init();

	let args:Vec<String> = std::env::args().skip(1).collect();
	let options = match parse_cli(&args)
	{
		Ok(options) => options,
		Err(code) => process::exit(code),
	};

	let knowledge = match runner::load_templates(&options.templates)
	{
		Ok(loaded) => loaded,
		Err(failure) =>
		{
			log::error!("{}", failure);
			process::exit(3);
		},
	};

	match runner::run_with_templates(&options, &knowledge)
	{
		Ok(()) => process::exit(0),
		Err(failure) =>
		{
			let code = exit_code_for(&failure.kind);
			log::error!("{}", failure);
			process::exit(code);
		},
	}
}
