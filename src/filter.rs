/*!

Theorem filters: four passes run in priority order over every candidate
theorem a configuration's last-added object makes true — trivial,
sub-theorem, simpler-definable, transitive — with first-match exclusivity.
A theorem matching none of them is the interesting case: a genuinely new,
non-reducible fact.

*/

use std::collections::HashMap;

use crate::model::{Configuration, ConfigurationObject, Construction, ObjectId, PredefinedKind, Theorem, TheoremObject, TheoremType};

///One template theorem loaded at startup, carrying the file and block it
///came from so a sub-theorem match can be reported by name, and the
///configuration it was stated over so a match can be validated against the
///construction that produced it, not just the theorem's bare statement.
#[derive(Clone,Debug)]
pub struct TemplateEntry
{
	pub pattern: Theorem,
	pub config: Configuration,
	pub file: String,
	pub index: usize,
}

///The startup-loaded library the sub-theorem pass matches against. Empty by
///default; `runner.rs` populates it from the parsed template directory.
#[derive(Clone)]
pub struct KnowledgeBase
{
	templates: Vec<TemplateEntry>,
}

impl KnowledgeBase
{
	pub fn new() -> KnowledgeBase
	{
		KnowledgeBase{ templates: Vec::new() }
	}
	pub fn with_templates(templates:Vec<TemplateEntry>) -> KnowledgeBase
	{
		KnowledgeBase{ templates }
	}
}

///How a candidate theorem was classified, in the priority order of §4.H. A
///theorem surviving with `None` is the interesting, unreduced case.
#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Classification
{
	Trivial,
	SubTheorem{ template_index: usize, template_file: String },
	SimplerDefinable,
	Transitive{ fact_a: String, fact_b: String },
}

///A candidate theorem together with its filter verdict.
#[derive(Clone,Debug)]
pub struct FilteredTheorem
{
	pub theorem: Theorem,
	pub classification: Option<Classification>,
}

///Run the four passes over every candidate found in `config`, in priority
///order, stopping at a theorem's first match. `candidates` doubles as the
///transitivity pass's fact pool: every other candidate found alongside a
///given theorem is itself a just-verified fact it may compose from.
pub fn apply_filters(config:&Configuration, candidates:Vec<Theorem>, knowledge:&KnowledgeBase) -> Vec<FilteredTheorem>
{
	let trivial_set = trivial_theorems(config);

	candidates.iter().enumerate().map(|(index,theorem)|
	{
		let classification = if trivial_set.contains(theorem)
		{
			Some(Classification::Trivial)
		}
		else if let Some(hit) = match_sub_theorem(theorem, config, knowledge)
		{
			Some(hit)
		}
		else if is_simpler_definable(config, theorem)
		{
			Some(Classification::SimplerDefinable)
		}
		else
		{
			let others = candidates.iter().enumerate().filter(|(other_index,_)| *other_index!=index).map(|(_,t)|t);
			match_transitivity(theorem, others)
		};
		FilteredTheorem{ theorem: theorem.clone(), classification }
	}).collect()
}

///The closed set of theorems that hold purely by definition of the
///configuration's last-added object, independent of any numeric
///verification: Midpoint always bisects its segment and sits between its
///endpoints, PerpendicularLine/PerpendicularProjection/ParallelLine always
///stand in the named relation to the line they were built from, and
///AngleBisector always splits its angle into two equal halves.
fn trivial_theorems(config:&Configuration) -> Vec<Theorem>
{
	let last_added = match config.last_added
	{
		Some(id) => id,
		None => return Vec::new(),
	};
	let ConfigurationObject::Constructed{construction,arguments,..} = config.get(last_added) else { return Vec::new(); };
	let Construction::Predefined(kind) = construction.as_ref() else { return Vec::new(); };

	let flat = flatten_object_ids(arguments);
	let mut out = Vec::new();
	match kind
	{
		PredefinedKind::Midpoint if flat.len()==2 =>
		{
			let (a,b) = (flat[0],flat[1]);
			out.push(sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(a,last_added),TheoremObject::Segment(last_added,b)]));
			out.push(sorted(TheoremType::CollinearPoints, vec![TheoremObject::Point(a),TheoremObject::Point(last_added),TheoremObject::Point(b)]));
		},
		PredefinedKind::PerpendicularLine if flat.len()==2 =>
		{
			let (line,point) = (flat[0],flat[1]);
			out.push(sorted(TheoremType::PerpendicularLines, vec![TheoremObject::Line(crate::model::LineRef::ByObject(last_added)),TheoremObject::Line(crate::model::LineRef::ByObject(line))]));
			let _ = point;
		},
		PredefinedKind::PerpendicularProjection if flat.len()==2 =>
		{
			let (line,point) = (flat[0],flat[1]);
			out.push(sorted(TheoremType::PerpendicularLines, vec![TheoremObject::Line(crate::model::LineRef::ByPoints(point,last_added)),TheoremObject::Line(crate::model::LineRef::ByObject(line))]));
		},
		PredefinedKind::ParallelLine if flat.len()==2 =>
		{
			let (line,_point) = (flat[0],flat[1]);
			out.push(sorted(TheoremType::ParallelLines, vec![TheoremObject::Line(crate::model::LineRef::ByObject(last_added)),TheoremObject::Line(crate::model::LineRef::ByObject(line))]));
		},
		PredefinedKind::AngleBisector if flat.len()==3 =>
		{
			let (vertex,p,q) = (flat[0],flat[1],flat[2]);
			let bisector = crate::model::LineRef::ByObject(last_added);
			out.push(sorted(TheoremType::EqualAngles, vec![
				TheoremObject::Angle(bisector,crate::model::LineRef::ByPoints(vertex,p)),
				TheoremObject::Angle(bisector,crate::model::LineRef::ByPoints(vertex,q)),
			]));
		},
		_ => {},
	}
	out
}

fn flatten_object_ids(arguments:&[crate::model::ArgumentValue]) -> Vec<ObjectId>
{
	let mut out = Vec::new();
	for argument in arguments { argument.object_ids(&mut out); }
	out
}

fn sorted(theorem_type:TheoremType, mut objects:Vec<TheoremObject>) -> Theorem
{
	objects.sort();
	Theorem{ theorem_type, objects }
}

///Match `theorem` against the template library by a signature-preserving
///identifier remapping from the template's own configuration into a
///sub-DAG of `config`: the statement shapes must relabel to the same
///canonical form (first-occurrence order), AND the corresponding objects,
///position for position under that same remapping, must have been built by
///the same construction lineage. Matching the statement shape alone (e.g.
///any `EqualLineSegments(X,Y)` sharing an endpoint) is not enough; a
///template built from a `Midpoint` only matches a candidate also built from
///one, not an unrelated construction that happens to state the same thing.
fn match_sub_theorem(theorem:&Theorem, config:&Configuration, knowledge:&KnowledgeBase) -> Option<Classification>
{
	let shape = canonical_shape(theorem);
	let candidate_ids = first_occurrence_ids(theorem);

	for entry in &knowledge.templates
	{
		if canonical_shape(&entry.pattern) != shape
		{
			continue;
		}
		let template_ids = first_occurrence_ids(&entry.pattern);
		let lineage_matches = candidate_ids.iter().zip(template_ids.iter()).all(|(&candidate_id,&template_id)|
			structural_signature(config,candidate_id) == structural_signature(&entry.config,template_id)
		);
		if lineage_matches
		{
			return Some(Classification::SubTheorem{ template_index: entry.index, template_file: entry.file.clone() });
		}
	}
	None
}

///The concrete identifiers a theorem's statement touches, in the same
///first-occurrence order [`relabel`] assigns labels in, so a candidate's and
///a template's object lists line up position for position under the shared
///canonical remapping.
fn first_occurrence_ids(theorem:&Theorem) -> Vec<ObjectId>
{
	let mut order = Vec::new();
	for object in &theorem.objects
	{
		for id in object.object_ids()
		{
			if !order.contains(&id) { order.push(id); }
		}
	}
	order
}

///A label-free fingerprint of how `id` was built inside `config`: a loose
///object's own type, or a constructed object's construction name and output
///index recursively applied to its arguments' fingerprints, with each `Set`
///argument's children sorted so the fingerprint doesn't depend on the
///argument's stored order. Two objects with the same fingerprint were built
///the same way, independent of which concrete configuration they live in.
fn structural_signature(config:&Configuration, id:ObjectId) -> String
{
	match config.get(id)
	{
		ConfigurationObject::Loose{object_type,..} => format!("loose:{:?}",object_type),
		ConfigurationObject::Constructed{construction,arguments,output_index,..} =>
		{
			let args:Vec<String> = arguments.iter().map(|argument| argument_signature(config,argument)).collect();
			format!("{}#{}({})",construction.name(),output_index,args.join(","))
		},
	}
}

fn argument_signature(config:&Configuration, argument:&crate::model::ArgumentValue) -> String
{
	use crate::model::ArgumentValue;
	match argument
	{
		ArgumentValue::Object(id) => structural_signature(config,*id),
		ArgumentValue::Set(items) =>
		{
			let mut signatures:Vec<String> = items.iter().map(|item| argument_signature(config,item)).collect();
			signatures.sort();
			format!("{{{}}}",signatures.join(";"))
		},
	}
}

fn canonical_shape(theorem:&Theorem) -> Theorem
{
	let mut labels:HashMap<ObjectId,ObjectId> = HashMap::new();
	let mut objects:Vec<TheoremObject> = theorem.objects.iter().map(|object| relabel(object,&mut labels)).collect();
	objects.sort();
	Theorem{ theorem_type: theorem.theorem_type, objects }
}

fn relabel(object:&TheoremObject, labels:&mut HashMap<ObjectId,ObjectId>) -> TheoremObject
{
	let mut next = |id:ObjectId| -> ObjectId
	{
		let fresh = ObjectId(labels.len() as u32);
		*labels.entry(id).or_insert(fresh)
	};
	match object
	{
		TheoremObject::Point(id) => TheoremObject::Point(next(*id)),
		TheoremObject::Segment(p,q) => TheoremObject::Segment(next(*p),next(*q)),
		TheoremObject::Line(line_ref) => TheoremObject::Line(relabel_line(line_ref,&mut next)),
		TheoremObject::Circle(circle_ref) => TheoremObject::Circle(relabel_circle(circle_ref,&mut next)),
		TheoremObject::Angle(l1,l2) => TheoremObject::Angle(relabel_line(l1,&mut next),relabel_line(l2,&mut next)),
	}
}

fn relabel_line(line_ref:&crate::model::LineRef, next:&mut impl FnMut(ObjectId)->ObjectId) -> crate::model::LineRef
{
	use crate::model::LineRef;
	match line_ref
	{
		LineRef::ByObject(id) => LineRef::ByObject(next(*id)),
		LineRef::ByPoints(p,q) => LineRef::ByPoints(next(*p),next(*q)),
	}
}

fn relabel_circle(circle_ref:&crate::model::CircleRef, next:&mut impl FnMut(ObjectId)->ObjectId) -> crate::model::CircleRef
{
	use crate::model::CircleRef;
	match circle_ref
	{
		CircleRef::ByObject(id) => CircleRef::ByObject(next(*id)),
		CircleRef::ByPoints(p,q,r) => CircleRef::ByPoints(next(*p),next(*q),next(*r)),
	}
}

///Whether `theorem` can be stated inside a strictly smaller sub-configuration
///of `config`: the transitive argument-dependency closure of every object it
///mentions, if it has fewer constructed objects than `config` itself.
fn is_simpler_definable(config:&Configuration, theorem:&Theorem) -> bool
{
	let mut touched:Vec<ObjectId> = theorem.objects.iter().flat_map(|object| object.object_ids()).collect();
	touched.sort();
	touched.dedup();

	let mut closure:std::collections::BTreeSet<ObjectId> = touched.iter().copied().collect();
	for &id in &touched
	{
		closure.extend(config.internal_objects(id).iter().copied());
	}
	let smaller_constructed_count = closure.iter().filter(|&&id| matches!(config.get(id), ConfigurationObject::Constructed{..})).count();
	smaller_constructed_count < config.constructed_count()
}

///For equivalence-relation theorem types, whether `theorem` is the
///composition of two other theorems already known to hold alongside it:
///ParallelLines and PerpendicularLines compose into each other or into
///themselves (parallel+parallel=parallel, perp+perp=parallel,
///parallel+perp=perp), EqualLineSegments and EqualAngles compose into
///themselves. ConcyclicPoints, seen as equality of the circumscribing
///circle, has a different shape (four-point sets, not object pairs) and is
///handled separately by [`match_concyclic_transitivity`].
fn match_transitivity<'a>(theorem:&Theorem, facts:impl Iterator<Item=&'a Theorem>) -> Option<Classification>
{
	if theorem.theorem_type==TheoremType::ConcyclicPoints
	{
		return match_concyclic_transitivity(theorem, facts);
	}

	let pair = match theorem.objects.as_slice()
	{
		[a,b] => (a.clone(),b.clone()),
		_ => return None,
	};
	if !matches!(theorem.theorem_type, TheoremType::ParallelLines | TheoremType::PerpendicularLines | TheoremType::EqualLineSegments | TheoremType::EqualAngles)
	{
		return None;
	}

	let facts:Vec<&Theorem> = facts.filter(|fact| fact.objects.len()==2 && relation_kind(fact.theorem_type).is_some()).collect();
	for left in &facts
	{
		for right in &facts
		{
			if std::ptr::eq(*left,*right) { continue; }
			let (l0,l1) = (&left.objects[0],&left.objects[1]);
			let (r0,r1) = (&right.objects[0],&right.objects[1]);
			let shared = if l1==r0 { Some((l0,r1)) }
				else if l0==r0 { Some((l1,r1)) }
				else if l1==r1 { Some((l0,r0)) }
				else if l0==r1 { Some((l1,r0)) }
				else { None };
			let Some((outer_a,outer_b)) = shared else { continue; };
			let composed = compose(relation_kind(left.theorem_type).unwrap(), relation_kind(right.theorem_type).unwrap());
			if composed==Some(relation_kind(theorem.theorem_type).unwrap())
				&& ((outer_a==&pair.0 && outer_b==&pair.1) || (outer_a==&pair.1 && outer_b==&pair.0))
			{
				return Some(Classification::Transitive{ fact_a: left.to_string(), fact_b: right.to_string() });
			}
		}
	}
	None
}

///Two ConcyclicPoints facts sharing three of their four points pin down the
///same circumscribing circle, so every four-point subset of their five-point
///union is concyclic too. `theorem` is transitive if its point set is one
///such subset.
fn match_concyclic_transitivity<'a>(theorem:&Theorem, facts:impl Iterator<Item=&'a Theorem>) -> Option<Classification>
{
	let target:std::collections::BTreeSet<ObjectId> = theorem.objects.iter().filter_map(point_id).collect();
	if target.len()!=4
	{
		return None;
	}

	let facts:Vec<&Theorem> = facts.filter(|fact| fact.theorem_type==TheoremType::ConcyclicPoints && fact.objects.len()==4).collect();
	for left in &facts
	{
		for right in &facts
		{
			if std::ptr::eq(*left,*right) { continue; }
			let left_points:std::collections::BTreeSet<ObjectId> = left.objects.iter().filter_map(point_id).collect();
			let right_points:std::collections::BTreeSet<ObjectId> = right.objects.iter().filter_map(point_id).collect();
			let shared = left_points.intersection(&right_points).count();
			if shared < 3 { continue; }
			let union:std::collections::BTreeSet<ObjectId> = left_points.union(&right_points).copied().collect();
			if target.is_subset(&union)
			{
				return Some(Classification::Transitive{ fact_a: left.to_string(), fact_b: right.to_string() });
			}
		}
	}
	None
}

fn point_id(object:&TheoremObject) -> Option<ObjectId>
{
	match object
	{
		TheoremObject::Point(id) => Some(*id),
		_ => None,
	}
}

///The transitivity composition table's two relation families: `Aligned`
///(parallel, equal segments, equal angles) is genuinely transitive;
///`Perpendicular` composes with itself back into `Aligned` and with
///`Aligned` into itself.
#[derive(Clone,Copy,PartialEq,Eq)]
enum RelationKind { Aligned, Perpendicular }

fn relation_kind(theorem_type:TheoremType) -> Option<RelationKind>
{
	match theorem_type
	{
		TheoremType::ParallelLines | TheoremType::EqualLineSegments | TheoremType::EqualAngles => Some(RelationKind::Aligned),
		TheoremType::PerpendicularLines => Some(RelationKind::Perpendicular),
		_ => None,
	}
}

fn compose(a:RelationKind, b:RelationKind) -> Option<RelationKind>
{
	use RelationKind::*;
	match (a,b)
	{
		(Aligned,Aligned) => Some(Aligned),
		(Perpendicular,Perpendicular) => Some(Aligned),
		(Aligned,Perpendicular) | (Perpendicular,Aligned) => Some(Perpendicular),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use std::sync::Arc;
	use crate::kernel::Layout;
	use crate::model::{ArgumentValue,PredefinedKind};

	fn triangle_with_midpoint() -> (Configuration,ObjectId,ObjectId,ObjectId,ObjectId)
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let (a,b,c) = (config.loose_ids[0],config.loose_ids[1],config.loose_ids[2]);
		let midpoint = config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::Midpoint)),
			vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)])], 0).unwrap();
		(config,a,b,c,midpoint)
	}

	#[test]
	fn midpoint_equal_segments_is_trivial()
	{
		let (config,a,b,_c,m) = triangle_with_midpoint();
		let theorem = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(a,m),TheoremObject::Segment(m,b)]);
		let knowledge = KnowledgeBase::new();
		let filtered = apply_filters(&config, vec![theorem], &knowledge);
		assert_eq!(filtered[0].classification, Some(Classification::Trivial));
	}

	#[test]
	fn unrelated_theorem_is_unclassified()
	{
		let (config,_a,_b,c,m) = triangle_with_midpoint();
		let theorem = sorted(TheoremType::CollinearPoints, vec![TheoremObject::Point(c),TheoremObject::Point(m),TheoremObject::Point(c)]);
		let knowledge = KnowledgeBase::new();
		let filtered = apply_filters(&config, vec![theorem], &knowledge);
		assert_eq!(filtered[0].classification, None);
	}

	#[test]
	fn sub_theorem_match_requires_the_same_construction_lineage()
	{
		let (config,a,b,_c,m) = triangle_with_midpoint();
		let candidate = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(a,m),TheoremObject::Segment(m,b)]);

		//A template stating the same shape, also built from a Midpoint: matches.
		let (template_config,ta,tb,_tc,tm) = triangle_with_midpoint();
		let template_pattern = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(ta,tm),TheoremObject::Segment(tm,tb)]);
		let knowledge = KnowledgeBase::with_templates(vec![TemplateEntry{ pattern: template_pattern, config: template_config, file: "medians.txt".to_string(), index: 0 }]);
		let filtered = apply_filters(&config, vec![candidate.clone()], &knowledge);
		assert!(matches!(filtered[0].classification, Some(Classification::SubTheorem{..})));

		//A template stating the same shape but built from unrelated loose points: no match.
		let unrelated_config = Configuration::new_loose(Layout::Triangle);
		let (ua,ub,uc) = (unrelated_config.loose_ids[0],unrelated_config.loose_ids[1],unrelated_config.loose_ids[2]);
		let unrelated_pattern = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(ua,ub),TheoremObject::Segment(ub,uc)]);
		let knowledge = KnowledgeBase::with_templates(vec![TemplateEntry{ pattern: unrelated_pattern, config: unrelated_config, file: "unrelated.txt".to_string(), index: 0 }]);
		let filtered = apply_filters(&config, vec![candidate], &knowledge);
		assert_eq!(filtered[0].classification, None);
	}

	#[test]
	fn relabeled_theorem_matches_template_shape()
	{
		let template = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(ObjectId(7),ObjectId(9)),TheoremObject::Segment(ObjectId(9),ObjectId(3))]);
		let candidate = sorted(TheoremType::EqualLineSegments, vec![TheoremObject::Segment(ObjectId(0),ObjectId(1)),TheoremObject::Segment(ObjectId(1),ObjectId(2))]);
		assert_eq!(canonical_shape(&template), canonical_shape(&candidate));
	}

	#[test]
	fn chained_parallels_compose_transitively()
	{
		let la = crate::model::LineRef::ByObject(ObjectId(0));
		let lb = crate::model::LineRef::ByObject(ObjectId(1));
		let lc = crate::model::LineRef::ByObject(ObjectId(2));
		let ab = sorted(TheoremType::ParallelLines, vec![TheoremObject::Line(la),TheoremObject::Line(lb)]);
		let bc = sorted(TheoremType::ParallelLines, vec![TheoremObject::Line(lb),TheoremObject::Line(lc)]);
		let ac = sorted(TheoremType::ParallelLines, vec![TheoremObject::Line(la),TheoremObject::Line(lc)]);
		let facts = vec![ab.clone(),bc.clone()];
		let result = match_transitivity(&ac, facts.iter());
		assert!(matches!(result, Some(Classification::Transitive{..})));
	}
}
