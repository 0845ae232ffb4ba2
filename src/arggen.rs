/*!

The argument generator: given a configuration and a target construction,
produces the distinct argument tuples that match the construction's
signature and are not already recorded in a forbidden-arguments index.

Grouping by object type and using `itertools`'s permutation/combination
combinators mirrors the way the topology layer enumerates coordinate tuples
for cartesian placements.

*/

use std::collections::{HashMap,HashSet};

use itertools::Itertools;

use crate::model::{ArgumentValue,Configuration,Construction,ObjectId,ObjectType,Parameter};

///Enumerate every argument tuple for `construction` over `config` that is
///not already present in `forbidden`, deduplicated against itself. Each
///returned tuple has one `ArgumentValue` per top-level parameter of the
///construction's signature, ready to hand to `Configuration::push_constructed`.
pub fn generate_arguments(config:&Configuration, construction:&Construction, forbidden:&HashSet<Vec<ArgumentValue>>) -> Vec<Vec<ArgumentValue>>
{
	let params = construction.parameters();
	let flat_types = flatten_types(&params);
	if flat_types.is_empty()
	{
		return Vec::new();
	}

	let mut slots_by_type:HashMap<ObjectType,Vec<usize>> = HashMap::new();
	for (slot,object_type) in flat_types.iter().enumerate()
	{
		slots_by_type.entry(*object_type).or_default().push(slot);
	}

	let types:Vec<ObjectType> = slots_by_type.keys().copied().collect();
	let mut per_type_variations:Vec<Vec<Vec<ObjectId>>> = Vec::with_capacity(types.len());
	for &object_type in &types
	{
		let k = slots_by_type[&object_type].len();
		let available = config.objects_of_type(object_type);
		let variations:Vec<Vec<ObjectId>> = available.into_iter().permutations(k).collect();
		if variations.is_empty()
		{
			//Not enough objects of this type exist; no tuple can be formed.
			return Vec::new();
		}
		per_type_variations.push(variations);
	}

	let mut seen:HashSet<Vec<ArgumentValue>> = HashSet::new();
	let mut out = Vec::new();
	for combination in per_type_variations.into_iter().multi_cartesian_product()
	{
		let mut flat_assignment = vec![ObjectId(0);flat_types.len()];
		for (type_index,&object_type) in types.iter().enumerate()
		{
			for (slot_position,&slot) in slots_by_type[&object_type].iter().enumerate()
			{
				flat_assignment[slot] = combination[type_index][slot_position];
			}
		}
		let mut cursor = flat_assignment.into_iter();
		let tuple:Vec<ArgumentValue> = params.iter().map(|param| fold_into_parameter(param,&mut cursor)).collect();
		if forbidden.contains(&tuple) { continue; }
		if seen.insert(tuple.clone())
		{
			out.push(tuple);
		}
	}
	out
}

fn flatten_types(params:&[Parameter]) -> Vec<ObjectType>
{
	params.iter().flat_map(|p|p.flat_types()).collect()
}

fn fold_into_parameter(param:&Parameter, cursor:&mut std::vec::IntoIter<ObjectId>) -> ArgumentValue
{
	match param
	{
		Parameter::Object(_) => ArgumentValue::Object(cursor.next().expect("cursor sized to exactly match the flattened signature")),
		Parameter::Set{inner,multiplicity} =>
		{
			let items = (0..*multiplicity).map(|_| fold_into_parameter(inner,cursor)).collect();
			ArgumentValue::new_set(items)
		},
	}
}
