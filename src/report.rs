/*!

The output writer: turns the runner's stream of per-configuration analysis
results into the deterministic plain-text report of §6 — an initial
configuration block, the iteration budget and construction list, then one
numbered section per generated configuration with its theorems annotated by
their filter classification.

*/

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config_parser::ParsedInput;
use crate::error::Error;
use crate::filter::{Classification,FilteredTheorem};
use crate::model::{CircleRef,Configuration,ConfigurationObject,LineRef,ObjectId,Theorem,TheoremObject};
use crate::worker::AnalysisResult;
use crate::{error,source_location};

const RULE:&str = "------------------------------------------------"; //48 dashes

///Render `id` under its declared name if it has one, otherwise a stable
///`#<id>` placeholder for objects the generator introduced.
fn label(names:&HashMap<ObjectId,String>, id:ObjectId) -> String
{
	names.get(&id).cloned().unwrap_or_else(|| format!("#{}",id))
}

fn format_line_ref(names:&HashMap<ObjectId,String>, line_ref:&LineRef) -> String
{
	match line_ref
	{
		LineRef::ByObject(id) => label(names,*id),
		LineRef::ByPoints(p,q) => format!("[{}, {}]",label(names,*p),label(names,*q)),
	}
}

fn format_circle_ref(names:&HashMap<ObjectId,String>, circle_ref:&CircleRef) -> String
{
	match circle_ref
	{
		CircleRef::ByObject(id) => label(names,*id),
		CircleRef::ByPoints(p,q,r) => format!("[{}, {}, {}]",label(names,*p),label(names,*q),label(names,*r)),
	}
}

fn format_theorem_object(names:&HashMap<ObjectId,String>, object:&TheoremObject) -> String
{
	match object
	{
		TheoremObject::Point(id) => label(names,*id),
		TheoremObject::Line(line_ref) => format_line_ref(names,line_ref),
		TheoremObject::Circle(circle_ref) => format_circle_ref(names,circle_ref),
		TheoremObject::Segment(p,q) => format!("{}-{}",label(names,*p),label(names,*q)),
		TheoremObject::Angle(l1,l2) => format!("({}, {})",format_line_ref(names,l1),format_line_ref(names,l2)),
	}
}

fn format_theorem(names:&HashMap<ObjectId,String>, theorem:&Theorem) -> String
{
	let objects:Vec<String> = theorem.objects.iter().map(|o|format_theorem_object(names,o)).collect();
	format!("{}({})",theorem.theorem_type,objects.join(", "))
}

fn classification_annotation(classification:&Classification) -> String
{
	match classification
	{
		Classification::Trivial => "trivial theorem".to_string(),
		Classification::SubTheorem{template_index,template_file} => format!("sub-theorem implied from theorem {} from file {}",template_index+1,template_file),
		Classification::SimplerDefinable => "can be defined in a simpler configuration".to_string(),
		Classification::Transitive{fact_a,fact_b} => format!("is true because of {} and {}",fact_a,fact_b),
	}
}

fn format_theorem_line(names:&HashMap<ObjectId,String>, number:usize, filtered:&FilteredTheorem) -> String
{
	let body = format_theorem(names,&filtered.theorem);
	match &filtered.classification
	{
		Some(classification) => format!(" {}. {} - {}",number,body,classification_annotation(classification)),
		None => format!(" {}. {}",number,body),
	}
}

///Render a configuration's constructed objects, one `name = Ctor(args)` line
///per object, using declared names where available and `#<id>` otherwise.
fn format_constructed_objects(config:&Configuration, names:&HashMap<ObjectId,String>) -> Vec<String>
{
	config.constructed_objects().map(|object|
	{
		let ConfigurationObject::Constructed{id,construction,arguments,output_index} = object else { unreachable!("constructed_objects only yields Constructed") };
		let args:Vec<String> = arguments.iter().map(|argument| format_argument(argument,names)).collect();
		let suffix = if *output_index==0 { String::new() } else { format!("[{}]",output_index) };
		format!("{} = {}({}){}", label(names,*id), construction.name(), args.join(", "), suffix)
	}).collect()
}

fn format_argument(argument:&crate::model::ArgumentValue, names:&HashMap<ObjectId,String>) -> String
{
	match argument
	{
		crate::model::ArgumentValue::Object(id) => label(names,*id),
		crate::model::ArgumentValue::Set(items) =>
		{
			let inner:Vec<String> = items.iter().map(|item|format_argument(item,names)).collect();
			format!("{{{}}}",inner.join(", "))
		},
	}
}

///Write the report for one input file to `path`.
pub fn write_report(path:&Path, parsed:&ParsedInput, iterations:usize, results:&[AnalysisResult]) -> Result<(),Error>
{
	let names:HashMap<ObjectId,String> = parsed.names.iter().map(|(name,id)|(*id,name.clone())).collect();
	let mut out = String::new();

	out.push_str("Initial configuration:\n");
	out.push_str(&format!("{:?} {}\n", parsed.layout, parsed.config.loose_ids.iter().map(|id|label(&names,*id)).collect::<Vec<_>>().join(" ")));
	for line in format_constructed_objects(&parsed.config,&names)
	{
		out.push_str(&line);
		out.push('\n');
	}
	out.push('\n');
	out.push_str(&format!("Iterations: {}\n", iterations));
	let construction_names:Vec<String> = parsed.rules.iter().map(|c|c.name()).collect();
	out.push_str(&format!("Constructions: {}\n", construction_names.join(", ")));

	for result in results
	{
		out.push('\n');
		out.push_str(RULE);
		out.push('\n');
		match result
		{
			AnalysisResult::Theorems{configuration,theorems} =>
			{
				for line in format_constructed_objects(configuration,&names)
				{
					out.push_str(&line);
					out.push('\n');
				}
				for (index,filtered) in theorems.iter().enumerate()
				{
					out.push_str(&format_theorem_line(&names,index+1,filtered));
					out.push('\n');
				}
			},
			AnalysisResult::Inconstructible{configuration,witness} =>
			{
				for line in format_constructed_objects(configuration,&names)
				{
					out.push_str(&line);
					out.push('\n');
				}
				out.push_str(&format!(" skipped: inconstructible, witness {}\n", label(&names,*witness)));
			},
			AnalysisResult::DuplicateBearing{configuration,older,newer} =>
			{
				for line in format_constructed_objects(configuration,&names)
				{
					out.push_str(&line);
					out.push('\n');
				}
				out.push_str(&format!(" skipped: {} duplicates {}\n", label(&names,*newer), label(&names,*older)));
			},
			AnalysisResult::Skipped{configuration,reason} =>
			{
				for line in format_constructed_objects(configuration,&names)
				{
					out.push_str(&line);
					out.push('\n');
				}
				out.push_str(&format!(" skipped: {}\n", reason));
			},
		}
	}

	let mut file = fs::File::create(path)
		.map_err(|e| error!(ill_formed_configuration).with_path(path.to_path_buf()).with_message(format!("could not create output file: {}",e)))?;
	file.write_all(out.as_bytes())
		.map_err(|e| error!(ill_formed_configuration).with_path(path.to_path_buf()).with_message(format!("could not write output file: {}",e)))?;
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::kernel::Layout;

	#[test]
	fn classification_annotations_match_the_literal_strings()
	{
		assert_eq!(classification_annotation(&Classification::Trivial), "trivial theorem");
		assert_eq!(classification_annotation(&Classification::SimplerDefinable), "can be defined in a simpler configuration");
		assert_eq!(classification_annotation(&Classification::SubTheorem{template_index:2,template_file:"medians.template".to_string()}),
			"sub-theorem implied from theorem 3 from file medians.template");
		assert_eq!(classification_annotation(&Classification::Transitive{fact_a:"ParallelLines(a, b)".to_string(),fact_b:"ParallelLines(b, c)".to_string()}),
			"is true because of ParallelLines(a, b) and ParallelLines(b, c)");
	}

	#[test]
	fn writes_a_report_file()
	{
		let config = Configuration::new_loose(Layout::Triangle);
		let mut names = HashMap::new();
		names.insert("A".to_string(), config.loose_ids[0]);
		names.insert("B".to_string(), config.loose_ids[1]);
		names.insert("C".to_string(), config.loose_ids[2]);
		let parsed = ParsedInput{ layout: Layout::Triangle, config, rules: Vec::new(), names };
		let dir = std::env::temp_dir().join(format!("geotheorems-report-test-{}",std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let path = dir.join("out.txt");
		write_report(&path,&parsed,1,&[]).unwrap();
		let contents = fs::read_to_string(&path).unwrap();
		assert!(contents.contains("Initial configuration:"));
		assert!(contents.contains("Iterations: 1"));
		fs::remove_file(&path).ok();
	}
}
