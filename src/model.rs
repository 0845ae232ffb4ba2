/*!

The core term model: the immutable DAG of loose and constructed objects,
constructions (predefined and composed), parameters, arguments and theorems
that every other module builds on.

Identifiers are assigned once, at construction, and never rewritten in place;
canonicalization (`canon.rs`) produces a *new* `Configuration` with new
identifiers rather than mutating this one, per the re-architecture notes.

*/

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::kernel::Layout;
use crate::{error,source_location};

///A stable small-integer identifier for an object within one configuration.
///Distinct from a bare array index so that canonicalization's identifier
///remap cannot be confused with positional indexing.
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		write!(f,"{}",self.0)
	}
}

///The three analytic families every object, parameter and theorem component
///is typed over.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum ObjectType
{
	Point,
	Line,
	Circle,
}

impl fmt::Display for ObjectType
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		let name = match self { ObjectType::Point=>"Point", ObjectType::Line=>"Line", ObjectType::Circle=>"Circle" };
		write!(f,"{}",name)
	}
}

///A parameter of a construction signature. Recursive: a set parameter's inner
///parameter may itself be a set, matching the nesting spec.md allows.
#[derive(Clone,Debug,PartialEq)]
pub enum Parameter
{
	Object(ObjectType),
	Set{ inner: Box<Parameter>, multiplicity: usize },
}

impl Parameter
{
	///The flat list of object types this parameter ultimately consumes, in
	///the order the argument generator should enumerate them. A set
	///parameter of multiplicity n contributes its inner type n times.
	pub fn flat_types(&self) -> Vec<ObjectType>
	{
		match self
		{
			Parameter::Object(t) => vec![*t],
			Parameter::Set{inner,multiplicity} =>
			{
				let inner_types = inner.flat_types();
				let mut out = Vec::with_capacity(inner_types.len()*multiplicity);
				for _ in 0..*multiplicity
				{
					out.extend(inner_types.iter().copied());
				}
				out
			},
		}
	}
}

///A normalized argument, instantiating a `Parameter`. Set arguments are kept
///sorted by their own ordering so two arguments built from the same
///unordered collection compare equal.
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
pub enum ArgumentValue
{
	Object(ObjectId),
	Set(Vec<ArgumentValue>),
}

impl ArgumentValue
{
	///Build a set argument, deduplicating and sorting its members so the
	///result does not depend on the order they were supplied in.
	pub fn new_set(mut inner:Vec<ArgumentValue>) -> ArgumentValue
	{
		inner.sort();
		inner.dedup();
		ArgumentValue::Set(inner)
	}
	///All object identifiers mentioned anywhere inside this argument.
	pub fn object_ids(&self, out:&mut Vec<ObjectId>)
	{
		match self
		{
			ArgumentValue::Object(id) => out.push(*id),
			ArgumentValue::Set(items) => for item in items { item.object_ids(out); },
		}
	}
}

impl PartialOrd for ArgumentValue
{
	fn partial_cmp(&self, other:&ArgumentValue) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}
impl Ord for ArgumentValue
{
	fn cmp(&self, other:&ArgumentValue) -> std::cmp::Ordering
	{
		use std::cmp::Ordering;
		match (self,other)
		{
			(ArgumentValue::Object(a),ArgumentValue::Object(b)) => a.cmp(b),
			(ArgumentValue::Object(_),ArgumentValue::Set(_)) => Ordering::Less,
			(ArgumentValue::Set(_),ArgumentValue::Object(_)) => Ordering::Greater,
			(ArgumentValue::Set(a),ArgumentValue::Set(b)) => a.cmp(b),
		}
	}
}

///One of the nine closed predefined operations. Each has a fixed signature
///and output type; `kernel.rs` supplies the analytic evaluation and
///`picture.rs` drives it per picture.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum PredefinedKind
{
	Midpoint,
	LineFromPoints,
	IntersectionOfLines,
	PerpendicularLine,
	PerpendicularProjection,
	ParallelLine,
	AngleBisector,
	Circumcircle,
	IntersectionOfLineAndCircle,
	IntersectionOfCircles,
}

impl PredefinedKind
{
	pub fn name(&self) -> &'static str
	{
		match self
		{
			PredefinedKind::Midpoint => "Midpoint",
			PredefinedKind::LineFromPoints => "LineFromPoints",
			PredefinedKind::IntersectionOfLines => "IntersectionOfLines",
			PredefinedKind::PerpendicularLine => "PerpendicularLine",
			PredefinedKind::PerpendicularProjection => "PerpendicularProjection",
			PredefinedKind::ParallelLine => "ParallelLine",
			PredefinedKind::AngleBisector => "AngleBisector",
			PredefinedKind::Circumcircle => "Circumcircle",
			PredefinedKind::IntersectionOfLineAndCircle => "IntersectionOfLineAndCircle",
			PredefinedKind::IntersectionOfCircles => "IntersectionOfCircles",
		}
	}
	///Constructions whose argument roles are interchangeable (the two points
	///handed to `Midpoint`, the three points of a `Circumcircle`) take a
	///single set parameter rather than several ordered object parameters, so
	///the argument generator enumerates one tuple per unordered choice
	///instead of one per ordering of the same choice.
	pub fn signature(&self) -> Vec<Parameter>
	{
		use ObjectType::*;
		match self
		{
			PredefinedKind::Midpoint => vec![Parameter::Set{ inner: Box::new(Parameter::Object(Point)), multiplicity: 2 }],
			PredefinedKind::LineFromPoints => vec![Parameter::Set{ inner: Box::new(Parameter::Object(Point)), multiplicity: 2 }],
			PredefinedKind::IntersectionOfLines => vec![Parameter::Set{ inner: Box::new(Parameter::Object(Line)), multiplicity: 2 }],
			PredefinedKind::PerpendicularLine => vec![Parameter::Object(Line),Parameter::Object(Point)],
			PredefinedKind::PerpendicularProjection => vec![Parameter::Object(Line),Parameter::Object(Point)],
			PredefinedKind::ParallelLine => vec![Parameter::Object(Line),Parameter::Object(Point)],
			PredefinedKind::AngleBisector => vec![Parameter::Object(Point), Parameter::Set{ inner: Box::new(Parameter::Object(Point)), multiplicity: 2 }],
			PredefinedKind::Circumcircle => vec![Parameter::Set{ inner: Box::new(Parameter::Object(Point)), multiplicity: 3 }],
			PredefinedKind::IntersectionOfLineAndCircle => vec![Parameter::Object(Line),Parameter::Object(Circle)],
			PredefinedKind::IntersectionOfCircles => vec![Parameter::Set{ inner: Box::new(Parameter::Object(Circle)), multiplicity: 2 }],
		}
	}
	pub fn output_type(&self) -> ObjectType
	{
		match self
		{
			PredefinedKind::Midpoint | PredefinedKind::PerpendicularProjection
				| PredefinedKind::IntersectionOfLines
				| PredefinedKind::IntersectionOfLineAndCircle
				| PredefinedKind::IntersectionOfCircles => ObjectType::Point,
			PredefinedKind::LineFromPoints | PredefinedKind::PerpendicularLine
				| PredefinedKind::ParallelLine | PredefinedKind::AngleBisector => ObjectType::Line,
			PredefinedKind::Circumcircle => ObjectType::Circle,
		}
	}
	///How many distinct outputs this construction can yield per argument
	///tuple. Only the two intersection-of-circle-ish constructions are
	///multi-output; every other construction always yields index 0.
	pub fn output_arity(&self) -> usize
	{
		match self
		{
			PredefinedKind::IntersectionOfLineAndCircle | PredefinedKind::IntersectionOfCircles => 2,
			_ => 1,
		}
	}
}

///A step inside a composed construction's body: apply `construction` to
///arguments built from the enclosing construction's parameters or from
///earlier steps' outputs.
#[derive(Clone,Debug)]
pub struct ComposedStep
{
	pub construction: Arc<Construction>,
	pub arguments: Vec<ArgumentTemplate>,
	pub output_index: usize,
}

///A template argument inside a composed construction's body, resolved at
///inlining time (see `picture::inline_composed`) rather than recursed into
///with a fresh picture set, per the re-architecture notes.
#[derive(Clone,Debug)]
pub enum ArgumentTemplate
{
	Parameter(usize),
	Step(usize),
	Set(Vec<ArgumentTemplate>),
}

///A user-defined macro: a named signature whose body is a short sequence of
///predefined (or further composed) steps, with one step singled out as the
///output.
#[derive(Clone,Debug)]
pub struct ComposedConstruction
{
	pub name: String,
	pub parameters: Vec<Parameter>,
	pub output_type: ObjectType,
	pub steps: Vec<ComposedStep>,
	pub output_step: usize,
}

///Either a predefined operation or a user-composed macro. Both expose a
///name, signature and output type; only predefined constructions carry
///analytic evaluation directly (`kernel.rs`), composed ones are inlined.
#[derive(Clone,Debug)]
pub enum Construction
{
	Predefined(PredefinedKind),
	Composed(Arc<ComposedConstruction>),
}

impl Construction
{
	pub fn name(&self) -> String
	{
		match self
		{
			Construction::Predefined(k) => k.name().to_string(),
			Construction::Composed(c) => c.name.clone(),
		}
	}
	pub fn parameters(&self) -> Vec<Parameter>
	{
		match self
		{
			Construction::Predefined(k) => k.signature(),
			Construction::Composed(c) => c.parameters.clone(),
		}
	}
	pub fn output_type(&self) -> ObjectType
	{
		match self
		{
			Construction::Predefined(k) => k.output_type(),
			Construction::Composed(c) => c.output_type,
		}
	}
	pub fn output_arity(&self) -> usize
	{
		match self
		{
			Construction::Predefined(k) => k.output_arity(),
			Construction::Composed(_) => 1,
		}
	}
	///Match a flat argument tuple (one `ArgumentValue` per top-level
	///parameter) against this construction's signature, checking arity and
	///element types via `type_of`. Fails with `signature-mismatch` on any
	///discrepancy.
	pub fn match_arguments(&self, arguments:&[ArgumentValue], type_of:&dyn Fn(ObjectId)->ObjectType) -> Result<(),Error>
	{
		let params = self.parameters();
		if params.len() != arguments.len()
		{
			return Err(error!(signature_mismatch).with_message(format!("{} expects {} arguments, got {}",self.name(),params.len(),arguments.len())));
		}
		for (param,argument) in params.iter().zip(arguments.iter())
		{
			check_argument_matches(param,argument,type_of, &self.name())?;
		}
		Ok(())
	}
}

fn check_argument_matches(param:&Parameter, argument:&ArgumentValue, type_of:&dyn Fn(ObjectId)->ObjectType, construction_name:&str) -> Result<(),Error>
{
	match (param,argument)
	{
		(Parameter::Object(t), ArgumentValue::Object(id)) =>
		{
			let actual = type_of(*id);
			if actual != *t
			{
				return Err(error!(signature_mismatch).with_message(format!("{}: expected {}, found {} for object {}",construction_name,t,actual,id)));
			}
			Ok(())
		},
		(Parameter::Set{inner,multiplicity}, ArgumentValue::Set(items)) =>
		{
			if items.len() != *multiplicity
			{
				return Err(error!(signature_mismatch).with_message(format!("{}: expected a set of {} elements, found {}",construction_name,multiplicity,items.len())));
			}
			for item in items
			{
				check_argument_matches(inner,item,type_of,construction_name)?;
			}
			Ok(())
		},
		_ => Err(error!(signature_mismatch).with_message(format!("{}: argument shape does not match its parameter",construction_name))),
	}
}

///One object in a configuration: either free (its position chosen by the
///layout's random generator) or built by applying a construction to earlier
///objects.
#[derive(Clone,Debug)]
pub enum ConfigurationObject
{
	Loose{ id: ObjectId, object_type: ObjectType },
	Constructed{ id: ObjectId, construction: Arc<Construction>, arguments: Vec<ArgumentValue>, output_index: usize },
}

impl ConfigurationObject
{
	pub fn id(&self) -> ObjectId
	{
		match self { ConfigurationObject::Loose{id,..} => *id, ConfigurationObject::Constructed{id,..} => *id }
	}
	pub fn object_type(&self) -> ObjectType
	{
		match self
		{
			ConfigurationObject::Loose{object_type,..} => *object_type,
			ConfigurationObject::Constructed{construction,..} => construction.output_type(),
		}
	}
}

///An ordered DAG of objects: the loose-object holder for `layout`, followed
///by the constructed objects in construction order. Identifiers are dense
///0-based indices into `objects`, assigned once at push time.
#[derive(Clone,Debug)]
pub struct Configuration
{
	pub layout: Layout,
	pub loose_ids: Vec<ObjectId>,
	objects: Vec<ConfigurationObject>,
	pub last_added: Option<ObjectId>,
	internal_cache: RefCell<HashMap<ObjectId,Arc<Vec<ObjectId>>>>,
}

impl Configuration
{
	///Build the loose-object holder for a layout: one `Loose` object per
	///slot, typed according to the layout (all layouts here are all-Point
	///except the explicit-line ones, whose first loose object is a Line).
	pub fn new_loose(layout:Layout) -> Configuration
	{
		let types = loose_object_types(layout);
		let objects:Vec<ConfigurationObject> = types.into_iter().enumerate()
			.map(|(i,object_type)| ConfigurationObject::Loose{ id: ObjectId(i as u32), object_type })
			.collect();
		let loose_ids = objects.iter().map(|o|o.id()).collect();
		Configuration{ layout, loose_ids, objects, last_added: None, internal_cache: RefCell::new(HashMap::new()) }
	}

	pub fn get(&self, id:ObjectId) -> &ConfigurationObject
	{
		&self.objects[id.0 as usize]
	}

	pub fn object_type(&self, id:ObjectId) -> ObjectType
	{
		self.get(id).object_type()
	}

	pub fn len(&self) -> usize { self.objects.len() }

	pub fn objects_of_type(&self, t:ObjectType) -> Vec<ObjectId>
	{
		self.objects.iter().filter(|o|o.object_type()==t).map(|o|o.id()).collect()
	}

	pub fn constructed_objects(&self) -> impl Iterator<Item=&ConfigurationObject>
	{
		self.objects.iter().filter(|o| matches!(o,ConfigurationObject::Constructed{..}))
	}

	pub fn constructed_count(&self) -> usize
	{
		self.constructed_objects().count()
	}

	///Append a constructed object, validating the argument tuple against
	///the construction's signature. Returns the fresh identifier.
	pub fn push_constructed(&mut self, construction:Arc<Construction>, arguments:Vec<ArgumentValue>, output_index:usize) -> Result<ObjectId,Error>
	{
		{
			let type_of = |id:ObjectId| self.object_type(id);
			construction.match_arguments(&arguments, &type_of)?;
		}
		if output_index >= construction.output_arity()
		{
			return Err(error!(signature_mismatch).with_message(format!("{} has no output index {}",construction.name(),output_index)));
		}
		let id = ObjectId(self.objects.len() as u32);
		self.objects.push(ConfigurationObject::Constructed{ id, construction, arguments, output_index });
		self.last_added = Some(id);
		Ok(id)
	}

	///Transitive closure of an object's argument dependencies, deduplicated
	///and sorted by identifier. Loose objects have no internal dependencies
	///beyond themselves. Memoized per object id since the same subtree is
	///queried repeatedly during canonicalization and theorem filtering.
	pub fn internal_objects(&self, id:ObjectId) -> Arc<Vec<ObjectId>>
	{
		if let Some(cached) = self.internal_cache.borrow().get(&id)
		{
			return cached.clone();
		}
		let mut seen = std::collections::BTreeSet::new();
		self.collect_internal(id,&mut seen);
		let result = Arc::new(seen.into_iter().collect::<Vec<_>>());
		self.internal_cache.borrow_mut().insert(id,result.clone());
		result
	}

	fn collect_internal(&self, id:ObjectId, seen:&mut std::collections::BTreeSet<ObjectId>)
	{
		if !seen.insert(id) { return; }
		if let ConfigurationObject::Constructed{arguments,..} = self.get(id)
		{
			let mut ids = Vec::new();
			for argument in arguments { argument.object_ids(&mut ids); }
			for dep in ids
			{
				for transitive in self.internal_objects(dep).iter()
				{
					seen.insert(*transitive);
				}
				seen.insert(dep);
			}
		}
	}
}

fn loose_object_types(layout:Layout) -> Vec<ObjectType>
{
	match layout
	{
		Layout::LineSegment => vec![ObjectType::Point,ObjectType::Point],
		Layout::Triangle | Layout::RightTriangle => vec![ObjectType::Point,ObjectType::Point,ObjectType::Point],
		Layout::Quadrilateral => vec![ObjectType::Point;4],
		Layout::ExplicitLineAndPoint => vec![ObjectType::Line,ObjectType::Point],
		Layout::ExplicitLineAndTwoPoints => vec![ObjectType::Line,ObjectType::Point,ObjectType::Point],
	}
}

///A line, named either by the object that is a Line or by two points that
///are understood to define it (spec.md's "Line by object OR by two defining
///points"). Theorems over layouts with no literal Line object, like the
///medians of a triangle, state their lines this way.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum LineRef
{
	ByObject(ObjectId),
	ByPoints(ObjectId,ObjectId),
}

impl LineRef
{
	///The objects this reference is built from: the line itself, or its two
	///defining points.
	pub fn object_ids(&self) -> Vec<ObjectId>
	{
		match self
		{
			LineRef::ByObject(id) => vec![*id],
			LineRef::ByPoints(p,q) => vec![*p,*q],
		}
	}
}

impl fmt::Display for LineRef
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
			LineRef::ByObject(id) => write!(f,"{}",id),
			LineRef::ByPoints(p,q) => write!(f,"[{}, {}]",p,q),
		}
	}
}

///A circle, named either directly or by three defining points.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum CircleRef
{
	ByObject(ObjectId),
	ByPoints(ObjectId,ObjectId,ObjectId),
}

impl CircleRef
{
	pub fn object_ids(&self) -> Vec<ObjectId>
	{
		match self
		{
			CircleRef::ByObject(id) => vec![*id],
			CircleRef::ByPoints(p,q,r) => vec![*p,*q,*r],
		}
	}
}

impl fmt::Display for CircleRef
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
			CircleRef::ByObject(id) => write!(f,"{}",id),
			CircleRef::ByPoints(p,q,r) => write!(f,"[{}, {}, {}]",p,q,r),
		}
	}
}

///One entity referenced inside a theorem statement. Ordered so a theorem's
///object list can be sorted into a canonical order (see `theorem.rs`'s
///normalization step), making structurally equivalent theorems compare equal.
#[derive(Clone,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum TheoremObject
{
	Point(ObjectId),
	Line(LineRef),
	Circle(CircleRef),
	Segment(ObjectId,ObjectId),
	Angle(LineRef,LineRef),
}

impl TheoremObject
{
	///All objects this theorem object is ultimately built from.
	pub fn object_ids(&self) -> Vec<ObjectId>
	{
		match self
		{
			TheoremObject::Point(id) => vec![*id],
			TheoremObject::Line(line_ref) => line_ref.object_ids(),
			TheoremObject::Circle(circle_ref) => circle_ref.object_ids(),
			TheoremObject::Segment(p,q) => vec![*p,*q],
			TheoremObject::Angle(l1,l2) =>
			{
				let mut ids = l1.object_ids();
				ids.extend(l2.object_ids());
				ids
			},
		}
	}
	///Whether `id` appears anywhere in this theorem object's definition.
	pub fn touches(&self, id:ObjectId) -> bool
	{
		self.object_ids().contains(&id)
	}
}

impl fmt::Display for TheoremObject
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		match self
		{
			TheoremObject::Point(id) => write!(f,"{}",id),
			TheoremObject::Line(line_ref) => write!(f,"{}",line_ref),
			TheoremObject::Circle(circle_ref) => write!(f,"{}",circle_ref),
			TheoremObject::Segment(p,q) => write!(f,"{}-{}",p,q),
			TheoremObject::Angle(l1,l2) => write!(f,"({}, {})",l1,l2),
		}
	}
}

///The nine theorem types of §3, all structural predicates numerically
///verified across a picture set.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum TheoremType
{
	EqualLineSegments,
	CollinearPoints,
	ConcurrentLines,
	ConcyclicPoints,
	ParallelLines,
	PerpendicularLines,
	TangentCircles,
	LineTangentToCircle,
	EqualAngles,
}

impl fmt::Display for TheoremType
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		let name = match self
		{
			TheoremType::EqualLineSegments => "EqualLineSegments",
			TheoremType::CollinearPoints => "CollinearPoints",
			TheoremType::ConcurrentLines => "ConcurrentLines",
			TheoremType::ConcyclicPoints => "ConcyclicPoints",
			TheoremType::ParallelLines => "ParallelLines",
			TheoremType::PerpendicularLines => "PerpendicularLines",
			TheoremType::TangentCircles => "TangentCircles",
			TheoremType::LineTangentToCircle => "LineTangentToCircle",
			TheoremType::EqualAngles => "EqualAngles",
		};
		write!(f,"{}",name)
	}
}

///A discovered theorem: a type plus its (already symmetry-normalized, by the
///time it leaves `theorem.rs`) unordered set of theorem objects.
#[derive(Clone,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct Theorem
{
	pub theorem_type: TheoremType,
	pub objects: Vec<TheoremObject>,
}

impl Theorem
{
	///Whether `id` appears in any of this theorem's objects. The finder uses
	///this to restrict emission to theorems involving a configuration's
	///last-added object.
	pub fn touches(&self, id:ObjectId) -> bool
	{
		self.objects.iter().any(|object| object.touches(id))
	}
}

impl fmt::Display for Theorem
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		let objects:Vec<String> = self.objects.iter().map(|o|o.to_string()).collect();
		write!(f,"{}({})",self.theorem_type,objects.join(", "))
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn midpoint_signature_matches_two_points()
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let a = config.loose_ids[0];
		let b = config.loose_ids[1];
		let construction = Arc::new(Construction::Predefined(PredefinedKind::Midpoint));
		let id = config.push_constructed(construction, vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)])], 0).unwrap();
		assert_eq!(config.object_type(id), ObjectType::Point);
		assert_eq!(config.last_added, Some(id));
	}

	#[test]
	fn signature_mismatch_on_wrong_type()
	{
		let mut config = Configuration::new_loose(Layout::ExplicitLineAndPoint);
		let line = config.loose_ids[0];
		let point = config.loose_ids[1];
		let construction = Arc::new(Construction::Predefined(PredefinedKind::Midpoint));
		let result = config.push_constructed(construction, vec![ArgumentValue::new_set(vec![ArgumentValue::Object(line),ArgumentValue::Object(point)])], 0);
		assert!(result.is_err());
	}

	#[test]
	fn internal_objects_is_transitive_and_deduplicated()
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let (a,b,c) = (config.loose_ids[0],config.loose_ids[1],config.loose_ids[2]);
		let mid_ab = config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::Midpoint)), vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)])], 0).unwrap();
		let mid_ac = config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::Midpoint)), vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(c)])], 0).unwrap();
		let line = config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::LineFromPoints)), vec![ArgumentValue::new_set(vec![ArgumentValue::Object(mid_ab),ArgumentValue::Object(mid_ac)])], 0).unwrap();
		let internals = config.internal_objects(line);
		assert!(internals.contains(&a));
		assert!(internals.contains(&b));
		assert!(internals.contains(&c));
		assert!(internals.contains(&mid_ab));
		assert!(internals.contains(&mid_ac));
	}

	#[test]
	fn set_argument_normalizes_order()
	{
		let one = ArgumentValue::new_set(vec![ArgumentValue::Object(ObjectId(2)),ArgumentValue::Object(ObjectId(0))]);
		let other = ArgumentValue::new_set(vec![ArgumentValue::Object(ObjectId(0)),ArgumentValue::Object(ObjectId(2))]);
		assert_eq!(one,other);
	}
}
