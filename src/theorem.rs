/*!

The theorem finder: given a realized configuration, enumerates candidate
theorems by structural iteration over its objects and numerically verifies
each across every picture in the set. Only theorems touching the
configuration's last-added object are emitted, since anything not touching it
already held in the parent configuration.

*/

use itertools::Itertools;

use crate::kernel::{self,Analytic,Circle,Line,Point};
use crate::model::{CircleRef,Configuration,LineRef,ObjectId,ObjectType,Theorem,TheoremObject,TheoremType};
use crate::picture::{Picture,PictureSet};

///Enumerate and numerically verify every candidate theorem touching
///`config.last_added`. Returns the empty vector for a configuration with no
///last-added object (the seed) since nothing new can have become true.
pub fn find_theorems(config:&Configuration, pictures:&PictureSet) -> Vec<Theorem>
{
	let last_added = match config.last_added
	{
		Some(id) => id,
		None => return Vec::new(),
	};

	let points = config.objects_of_type(ObjectType::Point);
	let lines = line_candidates(config);
	let circles = circle_candidates(config);

	let mut found = Vec::new();

	for triple in points.iter().copied().combinations(3)
	{
		let objects = vec![TheoremObject::Point(triple[0]),TheoremObject::Point(triple[1]),TheoremObject::Point(triple[2])];
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture| resolve_points(picture,&triple).map(|pts| kernel::are_collinear(&pts[0],&pts[1],&pts[2])))
		{
			found.push(normalize(TheoremType::CollinearPoints, objects));
		}
	}
	for quadruple in points.iter().copied().combinations(4)
	{
		let objects:Vec<TheoremObject> = quadruple.iter().map(|&id|TheoremObject::Point(id)).collect();
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture| resolve_points(picture,&quadruple).and_then(|pts|
		{
			let circle = Circle::through_points(&pts[0],&pts[1],&pts[2]).ok()?;
			Some(circle.lies_on(&pts[3]))
		}))
		{
			found.push(normalize(TheoremType::ConcyclicPoints, objects));
		}
	}
	for two_segments in points.iter().copied().combinations(2).combinations(2)
	{
		let (s1,s2) = (two_segments[0].clone(),two_segments[1].clone());
		let objects = vec![TheoremObject::Segment(s1[0],s1[1]),TheoremObject::Segment(s2[0],s2[1])];
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture|
		{
			let a = resolve_points(picture,&s1)?;
			let b = resolve_points(picture,&s2)?;
			Some(kernel::nearly_equal(a[0].distance(&a[1]), b[0].distance(&b[1])))
		})
		{
			found.push(normalize(TheoremType::EqualLineSegments, objects));
		}
	}
	for pair in lines.iter().cloned().combinations(2)
	{
		let objects = vec![TheoremObject::Line(pair[0]),TheoremObject::Line(pair[1])];
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture| resolve_lines(picture,&pair).map(|ls| ls[0].is_parallel(&ls[1])))
		{
			found.push(normalize(TheoremType::ParallelLines, objects.clone()));
		}
		if holds_for_all(pictures, |picture| resolve_lines(picture,&pair).map(|ls| ls[0].is_perpendicular(&ls[1])))
		{
			found.push(normalize(TheoremType::PerpendicularLines, objects));
		}
	}
	for triple in lines.iter().cloned().combinations(3)
	{
		let objects:Vec<TheoremObject> = triple.iter().map(|&l|TheoremObject::Line(l)).collect();
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture| resolve_lines(picture,&triple).and_then(|ls|
		{
			let p1 = kernel::intersect_line_line(&ls[0],&ls[1])?;
			let p2 = kernel::intersect_line_line(&ls[0],&ls[2])?;
			Some(p1==p2)
		}))
		{
			found.push(normalize(TheoremType::ConcurrentLines, objects));
		}
	}
	for pair in circles.iter().cloned().combinations(2)
	{
		let objects = vec![TheoremObject::Circle(pair[0]),TheoremObject::Circle(pair[1])];
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture| resolve_circles(picture,&pair).map(|cs| cs[0].is_tangent_to(&cs[1])))
		{
			found.push(normalize(TheoremType::TangentCircles, objects));
		}
	}
	for line in &lines
	{
		for circle in &circles
		{
			let objects = vec![TheoremObject::Line(*line),TheoremObject::Circle(*circle)];
			if !touches_any(&objects,last_added) { continue; }
			if holds_for_all(pictures, |picture|
			{
				let l = resolve_line(picture,line)?;
				let c = resolve_circle(picture,circle)?;
				Some(l.is_tangent_to(&c))
			})
			{
				found.push(normalize(TheoremType::LineTangentToCircle, objects));
			}
		}
	}
	let angles:Vec<(LineRef,LineRef)> = lines.iter().cloned().combinations(2).map(|p|(p[0],p[1])).collect();
	for pair in angles.iter().cloned().combinations(2)
	{
		let ((l1,l2),(l3,l4)) = (pair[0],pair[1]);
		let objects = vec![TheoremObject::Angle(l1,l2),TheoremObject::Angle(l3,l4)];
		if !touches_any(&objects,last_added) { continue; }
		if holds_for_all(pictures, |picture|
		{
			let a = resolve_line(picture,&l1)?; let b = resolve_line(picture,&l2)?;
			let c = resolve_line(picture,&l3)?; let d = resolve_line(picture,&l4)?;
			Some(kernel::nearly_equal(a.angle_cosine(&b), c.angle_cosine(&d)))
		})
		{
			found.push(normalize(TheoremType::EqualAngles, objects));
		}
	}

	found.sort();
	found.dedup();
	found
}

fn touches_any(objects:&[TheoremObject], last_added:ObjectId) -> bool
{
	objects.iter().any(|object| object.touches(last_added))
}

fn holds_for_all(pictures:&PictureSet, mut predicate:impl FnMut(&Picture) -> Option<bool>) -> bool
{
	pictures.iter().all(|picture| predicate(picture)==Some(true))
}

fn normalize(theorem_type:TheoremType, mut objects:Vec<TheoremObject>) -> Theorem
{
	objects.sort();
	Theorem{ theorem_type, objects }
}

///Every line reachable structurally: actual Line-typed objects by reference,
///plus every unordered pair of points as the line they determine (needed for
///layouts with no literal Line object, e.g. a triangle's medians).
fn line_candidates(config:&Configuration) -> Vec<LineRef>
{
	let mut out:Vec<LineRef> = config.objects_of_type(ObjectType::Line).into_iter().map(LineRef::ByObject).collect();
	for pair in config.objects_of_type(ObjectType::Point).into_iter().combinations(2)
	{
		out.push(LineRef::ByPoints(pair[0],pair[1]));
	}
	out
}

///Every circle reachable structurally: actual Circle-typed objects, plus
///every unordered triple of points as their circumscribing circle.
fn circle_candidates(config:&Configuration) -> Vec<CircleRef>
{
	let mut out:Vec<CircleRef> = config.objects_of_type(ObjectType::Circle).into_iter().map(CircleRef::ByObject).collect();
	for triple in config.objects_of_type(ObjectType::Point).into_iter().combinations(3)
	{
		out.push(CircleRef::ByPoints(triple[0],triple[1],triple[2]));
	}
	out
}

fn resolve_point(picture:&Picture, id:ObjectId) -> Option<Point>
{
	match picture.get(id)? { Analytic::Point(p) => Some(p), _ => None }
}

fn resolve_points(picture:&Picture, ids:&[ObjectId]) -> Option<Vec<Point>>
{
	ids.iter().map(|&id| resolve_point(picture,id)).collect()
}

fn resolve_line(picture:&Picture, line_ref:&LineRef) -> Option<Line>
{
	match line_ref
	{
		LineRef::ByObject(id) => match picture.get(*id)? { Analytic::Line(l) => Some(l), _ => None },
		LineRef::ByPoints(p,q) => Line::through_points(&resolve_point(picture,*p)?,&resolve_point(picture,*q)?).ok(),
	}
}

fn resolve_lines(picture:&Picture, refs:&[LineRef]) -> Option<Vec<Line>>
{
	refs.iter().map(|r| resolve_line(picture,r)).collect()
}

fn resolve_circle(picture:&Picture, circle_ref:&CircleRef) -> Option<Circle>
{
	match circle_ref
	{
		CircleRef::ByObject(id) => match picture.get(*id)? { Analytic::Circle(c) => Some(c), _ => None },
		CircleRef::ByPoints(p,q,r) => Circle::through_points(&resolve_point(picture,*p)?,&resolve_point(picture,*q)?,&resolve_point(picture,*r)?).ok(),
	}
}

fn resolve_circles(picture:&Picture, refs:&[CircleRef]) -> Option<Vec<Circle>>
{
	refs.iter().map(|r| resolve_circle(picture,r)).collect()
}

#[cfg(test)]
mod tests
{
	use super::*;
	use std::sync::Arc;
	use crate::kernel::Layout;
	use crate::model::{ArgumentValue,Construction,PredefinedKind};

	fn triangle_with_midpoint() -> (Configuration,ObjectId,ObjectId,ObjectId,ObjectId)
	{
		let mut config = Configuration::new_loose(Layout::Triangle);
		let (a,b,c) = (config.loose_ids[0],config.loose_ids[1],config.loose_ids[2]);
		let midpoint = config.push_constructed(Arc::new(Construction::Predefined(PredefinedKind::Midpoint)),
			vec![ArgumentValue::new_set(vec![ArgumentValue::Object(a),ArgumentValue::Object(b)])], 0).unwrap();
		(config,a,b,c,midpoint)
	}

	#[test]
	fn midpoint_yields_equal_line_segments()
	{
		let (config,_,_,_,_) = triangle_with_midpoint();
		let mut rng = rand::rngs::StdRng::seed_from_u64(3);
		let pictures = match crate::picture::realize(&config,5,5,&mut rng).unwrap()
		{
			crate::picture::RealizationOutcome::Success(p) => p,
			other => panic!("expected a successful realization, got {:?}",other),
		};
		let theorems = find_theorems(&config,&pictures);
		assert!(theorems.iter().any(|t| t.theorem_type==TheoremType::EqualLineSegments));
	}

	#[test]
	fn seed_configuration_yields_no_theorems()
	{
		let config = Configuration::new_loose(Layout::Triangle);
		let mut rng = rand::rngs::StdRng::seed_from_u64(3);
		let pictures = match crate::picture::realize(&config,5,5,&mut rng).unwrap()
		{
			crate::picture::RealizationOutcome::Success(p) => p,
			other => panic!("expected a successful realization, got {:?}",other),
		};
		assert!(find_theorems(&config,&pictures).is_empty());
	}

	use rand::SeedableRng;
}
