/*!

The runner: glues the input parser, the generator, the worker pool and the
report writer into one pass over an input directory, the way the teacher's
`directory_main`/`file_main` glue configuration parsing to simulation
execution. Warnings for skipped configurations are surfaced through `log`
rather than swallowed, per the propagation policy of §7.

*/

use std::fs;
use std::path::{Path,PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::config_parser::{self,ParsedTemplateBlock};
use crate::error::Error;
use crate::filter::{KnowledgeBase,TemplateEntry};
use crate::generate::{Generator,GeneratorOptions};
use crate::report;
use crate::worker::{self,AnalysisResult,WorkerOptions};
use crate::{error,source_location};

///The CLI's `run` surface, one field per flag of §6.
pub struct RunnerOptions
{
	pub inputs: PathBuf,
	pub templates: PathBuf,
	pub output: PathBuf,
	pub iterations: usize,
	pub pictures: usize,
	pub workers: usize,
	pub seed: u64,
	pub output_prefix: String,
	pub output_ext: String,
}

///Run every input file in `options.inputs` against the template library in
///`options.templates`, writing one report per input into `options.output`.
///Loads the templates itself; callers that need to distinguish a
///template-loading failure from a run failure (the CLI's exit codes) should
///call [`load_templates`] and [`run_with_templates`] directly instead.
pub fn run(options:&RunnerOptions) -> Result<(),Error>
{
	log::info!("loading template library from {}", options.templates.display());
	let knowledge = load_templates(&options.templates)?;
	run_with_templates(options,&knowledge)
}

///Run every input file against an already-loaded template library.
pub fn run_with_templates(options:&RunnerOptions, knowledge:&KnowledgeBase) -> Result<(),Error>
{
	if options.pictures < crate::picture::MIN_PICTURES
	{
		return Err(error!(bad_argument).with_message(format!("--pictures must be at least {}",crate::picture::MIN_PICTURES)));
	}

	fs::create_dir_all(&options.output)
		.map_err(|e| error!(ill_formed_configuration).with_path(options.output.clone()).with_message(format!("could not create output directory: {}",e)))?;

	let mut input_paths:Vec<PathBuf> = fs::read_dir(&options.inputs)
		.map_err(|e| error!(parse_failure).with_path(options.inputs.clone()).with_message(format!("could not read input directory: {}",e)))?
		.filter_map(|entry| entry.ok().map(|e|e.path()))
		.filter(|p| p.is_file())
		.collect();
	input_paths.sort();

	let cancel = Arc::new(AtomicBool::new(false));

	for input_path in &input_paths
	{
		run_one_input(input_path, options, knowledge, cancel.clone())?;
	}
	Ok(())
}

fn run_one_input(input_path:&Path, options:&RunnerOptions, knowledge:&KnowledgeBase, cancel:Arc<AtomicBool>) -> Result<(),Error>
{
	log::info!("analyzing {}", input_path.display());
	let parsed = config_parser::parse_input(input_path)?;

	let generator = Generator::new(parsed.config.clone(), GeneratorOptions{ catalogue: parsed.rules.clone(), max_depth: options.iterations });
	let worker_options = WorkerOptions
	{
		picture_count: options.pictures,
		retry_budget: crate::picture::DEFAULT_RETRY_BUDGET,
		worker_count: options.workers,
		seed: options.seed,
		per_configuration_timeout: Duration::from_secs(30),
	};

	let mut results = Vec::new();
	worker::run_pool(generator, None, knowledge.clone(), worker_options, cancel, |result|
	{
		if let AnalysisResult::Skipped{reason,..} = &result
		{
			log::warn!("skipped a configuration from {}: {}", input_path.display(), reason);
		}
		results.push(result);
	});

	let stem = input_path.file_stem().and_then(|s|s.to_str()).unwrap_or("input");
	let output_name = format!("{}{}.{}", options.output_prefix, stem, options.output_ext);
	let output_path = options.output.join(output_name);
	report::write_report(&output_path, &parsed, options.iterations, &results)
}

///Parse every file under `directory` as a template file, flattening all
///blocks across all files into one `KnowledgeBase` carrying each template's
///theorem, originating configuration and file/index metadata.
pub fn load_templates(directory:&Path) -> Result<KnowledgeBase,Error>
{
	let mut paths:Vec<PathBuf> = fs::read_dir(directory)
		.map_err(|e| error!(parse_failure).with_path(directory.to_path_buf()).with_message(format!("could not read template directory: {}",e)))?
		.filter_map(|entry| entry.ok().map(|e|e.path()))
		.filter(|p| p.is_file())
		.collect();
	paths.sort();

	let mut entries = Vec::new();
	for path in &paths
	{
		let blocks:Vec<ParsedTemplateBlock> = config_parser::parse_template_file(path)?;
		let file_name = path.file_name().and_then(|s|s.to_str()).unwrap_or("template").to_string();
		for (index,block) in blocks.into_iter().enumerate()
		{
			entries.push(TemplateEntry{ pattern: block.theorem, config: block.config, file: file_name.clone(), index });
		}
	}
	Ok(KnowledgeBase::with_templates(entries))
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn refuses_fewer_than_two_pictures()
	{
		let dir = std::env::temp_dir().join(format!("geotheorems-runner-test-{}",std::process::id()));
		let _ = fs::create_dir_all(&dir);
		let options = RunnerOptions
		{
			inputs: dir.join("inputs"), templates: dir.join("templates"), output: dir.join("out"),
			iterations: 1, pictures: 1, workers: 1, seed: 1,
			output_prefix: String::new(), output_ext: "txt".to_string(),
		};
		let result = run(&options);
		assert!(result.is_err());
	}
}
