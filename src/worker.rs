/*!

The concurrency layer: a plain `std::thread::scope` worker pool that drains
accepted configurations off a bounded channel and drives each one through
picture realization, theorem finding and filtering. Mirrors the teacher's
preference for direct `std::thread` use over an async runtime or `rayon`
(absent from its dependency tree); progress is reported the same way the
teacher reports simulation progress, through `indicatif`.

*/

use std::sync::atomic::{AtomicBool,Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration,Instant};

use indicatif::{ProgressBar,ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Error;
use crate::filter::{self,FilteredTheorem,KnowledgeBase};
use crate::model::{Configuration,Construction};
use crate::picture::{self,RealizationOutcome};
use crate::theorem;
use crate::{error,source_location};

///Knobs for the worker pool, matching the CLI's `--pictures`/`--workers`/
///`--seed` surface.
#[derive(Clone)]
pub struct WorkerOptions
{
	pub picture_count: usize,
	pub retry_budget: usize,
	pub worker_count: usize,
	pub seed: u64,
	///Soft wall-clock budget per configuration; exceeding it yields an
	///`analysis-timeout` result rather than blocking the pool forever.
	pub per_configuration_timeout: Duration,
}

impl WorkerOptions
{
	///`--workers 1` is the single-thread deterministic mode of §5: one
	///worker, one RNG stream, results drained in submission order.
	pub fn is_single_threaded(&self) -> bool { self.worker_count <= 1 }
}

///What analyzing one configuration produced, successes and skips alike; the
///runner turns each of these into either a report entry or a warning line.
pub enum AnalysisResult
{
	Theorems{ configuration: Configuration, theorems: Vec<FilteredTheorem> },
	Inconstructible{ configuration: Configuration, witness: crate::model::ObjectId },
	DuplicateBearing{ configuration: Configuration, older: crate::model::ObjectId, newer: crate::model::ObjectId },
	Skipped{ configuration: Configuration, reason: Error },
}

///Analyze one configuration against a shared, read-only knowledge base:
///realize its picture set, find candidate theorems, and filter them. A soft
///per-configuration deadline turns an overrunning analysis into an
///`analysis-timeout` skip instead of hanging the worker.
fn analyze_one(config:Configuration, knowledge:&KnowledgeBase, options:&WorkerOptions, rng:&mut StdRng) -> AnalysisResult
{
	let deadline = Instant::now() + options.per_configuration_timeout;
	let outcome = picture::realize(&config, options.picture_count, options.retry_budget, rng);
	if Instant::now() > deadline
	{
		return AnalysisResult::Skipped{ configuration: config, reason: error!(analysis_timeout) };
	}
	match outcome
	{
		Err(failure) => AnalysisResult::Skipped{ configuration: config, reason: failure },
		Ok(RealizationOutcome::Inconstructible{ witness }) => AnalysisResult::Inconstructible{ configuration: config, witness },
		Ok(RealizationOutcome::DuplicateBearing{ older, newer }) => AnalysisResult::DuplicateBearing{ configuration: config, older, newer },
		Ok(RealizationOutcome::Success(pictures)) =>
		{
			let candidates = theorem::find_theorems(&config,&pictures);
			if Instant::now() > deadline
			{
				return AnalysisResult::Skipped{ configuration: config, reason: error!(analysis_timeout) };
			}
			let surviving = filter::apply_filters(&config,candidates,knowledge);
			AnalysisResult::Theorems{ configuration: config, theorems: surviving }
		},
	}
}

///Drive `configurations` to completion, fanning out across `options.worker_count`
///threads (or running inline when it is 1, for reproducible single-thread
///runs). `on_result` is called on the scheduling thread for every finished
///configuration, in arrival order; `cancel` is checked at configuration
///boundaries so a shutdown request can stop the pool between units of work
///without discarding in-flight pictures.
pub fn run_pool<I>(configurations:I, catalogue_for_progress_hint:Option<usize>, knowledge:KnowledgeBase, options:WorkerOptions, cancel:Arc<AtomicBool>, mut on_result:impl FnMut(AnalysisResult))
	where I: Iterator<Item=Configuration>
{
	let progress = build_progress_bar(catalogue_for_progress_hint);

	if options.is_single_threaded()
	{
		let mut rng = StdRng::seed_from_u64(options.seed);
		for config in configurations
		{
			if cancel.load(Ordering::Relaxed) { break; }
			let result = analyze_one(config,&knowledge,&options,&mut rng);
			progress.inc(1);
			on_result(result);
		}
		progress.finish_and_clear();
		return;
	}

	let (work_tx,work_rx) = mpsc::sync_channel::<Configuration>(options.worker_count*2);
	let (result_tx,result_rx) = mpsc::channel::<AnalysisResult>();
	let work_rx = Arc::new(std::sync::Mutex::new(work_rx));

	std::thread::scope(|scope|
	{
		for worker_index in 0..options.worker_count
		{
			let work_rx = work_rx.clone();
			let result_tx = result_tx.clone();
			let knowledge = &knowledge;
			let options = &options;
			let cancel = cancel.clone();
			scope.spawn(move ||
			{
				let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(worker_index as u64));
				loop
				{
					if cancel.load(Ordering::Relaxed) { break; }
					let config = { let guard = work_rx.lock().expect("worker pool mutex is never poisoned by a panicking worker in normal operation"); guard.recv() };
					match config
					{
						Ok(config) =>
						{
							let result = analyze_one(config,knowledge,options,&mut rng);
							if result_tx.send(result).is_err() { break; }
						},
						Err(_) => break, //the generator thread finished and dropped its sender
					}
				}
			});
		}
		drop(result_tx);

		let feeder_cancel = cancel.clone();
		scope.spawn(move ||
		{
			for config in configurations
			{
				if feeder_cancel.load(Ordering::Relaxed) { break; }
				if work_tx.send(config).is_err() { break; }
			}
		});

		for result in result_rx
		{
			progress.inc(1);
			on_result(result);
		}
	});
	progress.finish_and_clear();
}

fn build_progress_bar(total_hint:Option<usize>) -> ProgressBar
{
	match total_hint
	{
		Some(total) =>
		{
			let bar = ProgressBar::new(total as u64);
			bar.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} configurations analyzed"));
			bar
		},
		None => ProgressBar::new_spinner(),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::kernel::Layout;
	use crate::model::PredefinedKind;
	use std::sync::atomic::AtomicUsize;

	fn midpoint_catalogue() -> Vec<Arc<Construction>>
	{
		vec![Arc::new(Construction::Predefined(PredefinedKind::Midpoint))]
	}

	#[test]
	fn single_threaded_mode_processes_every_configuration()
	{
		let generator = crate::generate::Generator::new(
			Configuration::new_loose(Layout::Triangle),
			crate::generate::GeneratorOptions{ catalogue: midpoint_catalogue(), max_depth: 1 },
		);
		let options = WorkerOptions{ picture_count: 3, retry_budget: 3, worker_count: 1, seed: 1, per_configuration_timeout: Duration::from_secs(5) };
		let count = AtomicUsize::new(0);
		run_pool(generator, Some(4), KnowledgeBase::new(), options, Arc::new(AtomicBool::new(false)), |_| { count.fetch_add(1,Ordering::Relaxed); });
		assert_eq!(count.load(Ordering::Relaxed), 4);
	}

	#[test]
	fn multi_threaded_mode_processes_every_configuration()
	{
		let generator = crate::generate::Generator::new(
			Configuration::new_loose(Layout::Triangle),
			crate::generate::GeneratorOptions{ catalogue: midpoint_catalogue(), max_depth: 1 },
		);
		let options = WorkerOptions{ picture_count: 3, retry_budget: 3, worker_count: 2, seed: 1, per_configuration_timeout: Duration::from_secs(5) };
		let count = AtomicUsize::new(0);
		run_pool(generator, Some(4), KnowledgeBase::new(), options, Arc::new(AtomicBool::new(false)), |_| { count.fetch_add(1,Ordering::Relaxed); });
		assert_eq!(count.load(Ordering::Relaxed), 4);
	}

	#[test]
	fn cancellation_stops_single_threaded_mode_early()
	{
		let generator = crate::generate::Generator::new(
			Configuration::new_loose(Layout::Triangle),
			crate::generate::GeneratorOptions{ catalogue: midpoint_catalogue(), max_depth: 1 },
		);
		let options = WorkerOptions{ picture_count: 3, retry_budget: 3, worker_count: 1, seed: 1, per_configuration_timeout: Duration::from_secs(5) };
		let cancel = Arc::new(AtomicBool::new(true));
		let count = AtomicUsize::new(0);
		run_pool(generator, Some(4), KnowledgeBase::new(), options, cancel, |_| { count.fetch_add(1,Ordering::Relaxed); });
		assert_eq!(count.load(Ordering::Relaxed), 0);
	}
}
