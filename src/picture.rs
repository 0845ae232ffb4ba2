/*!

Picture set & geometry constructor: realizes a configuration in several
independently randomized numeric pictures, cross-checks constructability and
duplicate coincidence between them, and retries from scratch on disagreement.

A picture never mutates another; each worker in `worker.rs` owns its own
`StdRng` and calls [`realize`] directly, matching the "no shared mutable state
touches the analytic layer" rule of the concurrency model.

*/

use rand::rngs::StdRng;

use crate::error::Error;
use crate::kernel::{self,Analytic,Layout};
use crate::model::{ArgumentValue,Configuration,ConfigurationObject,Construction,ObjectId};
use crate::{error,source_location};

///The cross-picture consistency contract requires at least this many
///independently drawn pictures to even ask the "did every picture agree?"
///question.
pub const MIN_PICTURES: usize = 2;
pub const DEFAULT_PICTURE_COUNT: usize = 5;
pub const DEFAULT_RETRY_BUDGET: usize = 5;

///One numeric realization of a configuration: an analytic value per object,
///or `None` if that object failed to construct in this particular picture.
#[derive(Clone,Debug)]
pub struct Picture
{
	values: Vec<Option<Analytic>>,
}

impl Picture
{
	pub fn get(&self, id:ObjectId) -> Option<Analytic>
	{
		self.values[id.0 as usize]
	}
}

///An ordered collection of independently drawn pictures of the same
///configuration, all of which agreed on constructability and duplicates.
#[derive(Clone,Debug)]
pub struct PictureSet
{
	pictures: Vec<Picture>,
}

impl PictureSet
{
	pub fn len(&self) -> usize { self.pictures.len() }
	pub fn get(&self, index:usize) -> &Picture { &self.pictures[index] }
	pub fn iter(&self) -> impl Iterator<Item=&Picture> { self.pictures.iter() }
}

///The outcome of realizing a configuration once cross-picture agreement is
///reached. These are classification outcomes, not run failures; the runner
///reports and prunes accordingly.
#[derive(Clone,Debug)]
pub enum RealizationOutcome
{
	Success(PictureSet),
	///Every picture agreed that `witness` could not be constructed.
	Inconstructible{ witness: ObjectId },
	///Every picture agreed that `newer` coincides with the earlier object
	///`older`; callers should treat `newer` as equivalent to `older`.
	DuplicateBearing{ older: ObjectId, newer: ObjectId },
}

///Realize `config` into a set of `picture_count` pictures, rebuilding all of
///them from scratch up to `retry_budget` times whenever they disagree on
///constructability or duplicate coincidence (the "analytic-failure" and
///"inconsistent-pictures" faults of the error taxonomy, both recovered
///locally). Fails with `unresolved-inconsistency` if agreement is never
///reached within the budget.
pub fn realize(config:&Configuration, picture_count:usize, retry_budget:usize, rng:&mut StdRng) -> Result<RealizationOutcome,Error>
{
	if picture_count < MIN_PICTURES
	{
		return Err(error!(bad_argument).with_message(format!("a picture set needs at least {} pictures, got {}",MIN_PICTURES,picture_count)));
	}
	for _attempt in 0..retry_budget
	{
		let mut pictures = Vec::with_capacity(picture_count);
		let mut invalidated = false;
		for _ in 0..picture_count
		{
			match build_picture(config,rng)
			{
				Some(picture) => pictures.push(picture),
				None => { invalidated = true; break; },
			}
		}
		if invalidated { continue; }
		if let Some(outcome) = check_agreement(config,&pictures)
		{
			return Ok(outcome);
		}
	}
	Err(error!(unresolved_inconsistency).with_message(format!("pictures disagreed on constructability or duplicates after {} attempts",retry_budget)))
}

///Draw one fresh picture: a random non-degenerate loose layout, then every
///constructed object evaluated in construction order. Returns `None` if the
///loose layout or any construction step degenerated (an analytic-failure),
///which invalidates the whole attempt rather than just one object.
fn build_picture(config:&Configuration, rng:&mut StdRng) -> Option<Picture>
{
	let loose_values = config.layout.random(rng).ok()?;
	let mut values:Vec<Option<Analytic>> = vec![None; config.len()];
	for (loose_id,value) in config.loose_ids.iter().zip(loose_values.into_iter())
	{
		values[loose_id.0 as usize] = Some(value);
	}
	for object in config.constructed_objects()
	{
		if let ConfigurationObject::Constructed{ id, construction, arguments, output_index } = object
		{
			let inputs = match flatten_arguments(arguments,&values)
			{
				Some(inputs) => inputs,
				None => { values[id.0 as usize] = None; continue; },
			};
			let result = match construction.as_ref()
			{
				Construction::Predefined(kind) => kernel::apply_predefined(*kind,&inputs,*output_index),
				Construction::Composed(_) => Err(error!(unhandled_feedback_kind)
					.with_message(String::from("composed constructions must be inlined before picture realization"))),
			};
			match result
			{
				Ok(Some(analytic)) => values[id.0 as usize] = Some(analytic),
				Ok(None) => values[id.0 as usize] = None,
				Err(_) => return None,
			}
		}
	}
	Some(Picture{ values })
}

///Resolve a construction's argument tuple to the flat `Analytic` inputs
///`kernel::apply_predefined` expects, in the same order the signature was
///flattened in by `arggen.rs`. `None` if any referenced object has no value
///in this picture (it is itself unconstructible, so nothing built from it
///can be constructible either).
fn flatten_arguments(arguments:&[ArgumentValue], values:&[Option<Analytic>]) -> Option<Vec<Analytic>>
{
	let mut out = Vec::new();
	for argument in arguments
	{
		flatten_one(argument,values,&mut out)?;
	}
	Some(out)
}

fn flatten_one(argument:&ArgumentValue, values:&[Option<Analytic>], out:&mut Vec<Analytic>) -> Option<()>
{
	match argument
	{
		ArgumentValue::Object(id) => { out.push(values[id.0 as usize]?); Some(()) },
		ArgumentValue::Set(items) =>
		{
			for item in items { flatten_one(item,values,out)?; }
			Some(())
		},
	}
}

///Check whether every picture agrees on constructability and duplicate
///coincidence for every constructed object. `None` means disagreement
///somewhere (the caller should retry); `Some` carries the classification.
fn check_agreement(config:&Configuration, pictures:&[Picture]) -> Option<RealizationOutcome>
{
	let mut first_inconstructible:Option<ObjectId> = None;
	let mut first_duplicate:Option<(ObjectId,ObjectId)> = None;
	for object in config.constructed_objects()
	{
		let id = object.id();
		let constructible_in_first = pictures[0].get(id).is_some();
		if pictures.iter().any(|picture| picture.get(id).is_some() != constructible_in_first)
		{
			return None;
		}
		if !constructible_in_first
		{
			if first_inconstructible.is_none() { first_inconstructible = Some(id); }
			continue;
		}
		let matches:Vec<Option<ObjectId>> = pictures.iter().map(|picture| earliest_coincidence(picture,id)).collect();
		let agrees_it_is_a_duplicate = matches[0].is_some();
		if matches.iter().any(|m| m.is_some() != agrees_it_is_a_duplicate)
		{
			return None;
		}
		if agrees_it_is_a_duplicate && first_duplicate.is_none()
		{
			first_duplicate = Some((matches[0].unwrap(), id));
		}
	}
	if let Some(witness) = first_inconstructible
	{
		return Some(RealizationOutcome::Inconstructible{ witness });
	}
	if let Some((older,newer)) = first_duplicate
	{
		return Some(RealizationOutcome::DuplicateBearing{ older, newer });
	}
	Some(RealizationOutcome::Success(PictureSet{ pictures: pictures.to_vec() }))
}

///The smallest-id object that `id` coincides with in `picture`, if any.
fn earliest_coincidence(picture:&Picture, id:ObjectId) -> Option<ObjectId>
{
	let value = picture.get(id)?;
	(0..id.0).map(ObjectId).find(|&earlier| picture.get(earlier) == Some(value))
}

#[cfg(test)]
mod tests
{
	use super::*;
	use rand::SeedableRng;
	use std::sync::Arc;
	use crate::model::PredefinedKind;

	fn rng() -> StdRng { StdRng::seed_from_u64(11) }

	#[test]
	fn bare_seed_realizes_successfully()
	{
		let config = Configuration::new_loose(Layout::Triangle);
		let outcome = realize(&config, DEFAULT_PICTURE_COUNT, DEFAULT_RETRY_BUDGET, &mut rng()).unwrap();
		match outcome
		{
			RealizationOutcome::Success(pictures) => assert_eq!(pictures.len(), DEFAULT_PICTURE_COUNT),
			other => panic!("expected Success, got {:?}",other),
		}
	}

	#[test]
	fn midpoint_of_a_triangle_edge_always_constructs()
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let (a,b) = (config.loose_ids[0],config.loose_ids[1]);
		config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::Midpoint)),
			vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)])], 0).unwrap();
		let outcome = realize(&config, DEFAULT_PICTURE_COUNT, DEFAULT_RETRY_BUDGET, &mut rng()).unwrap();
		assert!(matches!(outcome, RealizationOutcome::Success(_)));
	}

	#[test]
	fn repeating_the_same_midpoint_is_a_duplicate()
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let (a,b) = (config.loose_ids[0],config.loose_ids[1]);
		let midpoint = Arc::new(Construction::Predefined(PredefinedKind::Midpoint));
		let pair = ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)]);
		let first = config.push_constructed(midpoint.clone(), vec![pair.clone()], 0).unwrap();
		let second = config.push_constructed(midpoint, vec![pair], 0).unwrap();
		let outcome = realize(&config, DEFAULT_PICTURE_COUNT, DEFAULT_RETRY_BUDGET, &mut rng()).unwrap();
		match outcome
		{
			RealizationOutcome::DuplicateBearing{ older, newer } => { assert_eq!(older,first); assert_eq!(newer,second); },
			other => panic!("expected DuplicateBearing, got {:?}",other),
		}
	}

	#[test]
	fn two_lines_parallel_to_the_same_line_never_meet()
	{
		let mut config = Configuration::new_loose(Layout::ExplicitLineAndTwoPoints);
		let (line,a,b) = (config.loose_ids[0],config.loose_ids[1],config.loose_ids[2]);
		let parallel = Arc::new(Construction::Predefined(PredefinedKind::ParallelLine));
		let through_a = config.push_constructed(parallel.clone(), vec![ArgumentValue::Object(line),ArgumentValue::Object(a)], 0).unwrap();
		let through_b = config.push_constructed(parallel, vec![ArgumentValue::Object(line),ArgumentValue::Object(b)], 0).unwrap();
		let meet = Arc::new(Construction::Predefined(PredefinedKind::IntersectionOfLines));
		let witness = config.push_constructed(meet, vec![ArgumentValue::new_set(vec![ArgumentValue::Object(through_a),ArgumentValue::Object(through_b)])], 0).unwrap();
		let outcome = realize(&config, DEFAULT_PICTURE_COUNT, DEFAULT_RETRY_BUDGET, &mut rng()).unwrap();
		match outcome
		{
			RealizationOutcome::Inconstructible{ witness: found } => assert_eq!(found,witness),
			other => panic!("expected Inconstructible, got {:?}",other),
		}
	}

	#[test]
	fn rejects_fewer_than_two_pictures()
	{
		let config = Configuration::new_loose(Layout::Triangle);
		assert!(realize(&config, 1, DEFAULT_RETRY_BUDGET, &mut rng()).is_err());
	}
}
