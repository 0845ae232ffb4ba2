/*!

The text-file front end: a hand-rolled line/token scanner for the generator's
input file grammar (layout declaration, constructed-object lines, a `Rules:`
block) and for the template theorem file grammar (the same configuration
shape, one or more per file, each closed by a `Theorem:` declaration). Not a
general-purpose expression grammar like the teacher's own configuration
language — this format is a flat sequence of lines, so a per-line tokenizer
is all it needs.

*/

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error,TextPosition};
use crate::kernel::Layout;
use crate::model::{ArgumentValue,CircleRef,Configuration,Construction,LineRef,ObjectId,ObjectType,PredefinedKind,Theorem,TheoremObject,TheoremType};
use crate::{error,source_location};

#[derive(Clone,Debug,PartialEq)]
enum TokenKind
{
	Ident(String),
	Equals,
	Colon,
	Comma,
	Dash,
	LParen,
	RParen,
	LBrace,
	RBrace,
	LBracket,
	RBracket,
}

#[derive(Clone,Debug)]
struct Token
{
	kind: TokenKind,
	position: TextPosition,
}

fn tokenize_line(line:&str, line_number:usize) -> Vec<Token>
{
	let mut tokens = Vec::new();
	let chars:Vec<char> = line.chars().collect();
	let mut i = 0;
	while i < chars.len()
	{
		let c = chars[i];
		let column = i+1;
		if c.is_whitespace() { i += 1; continue; }
		if c=='#' { break; }
		let single = match c
		{
			'=' => Some(TokenKind::Equals),
			':' => Some(TokenKind::Colon),
			',' => Some(TokenKind::Comma),
			'-' => Some(TokenKind::Dash),
			'(' => Some(TokenKind::LParen),
			')' => Some(TokenKind::RParen),
			'{' => Some(TokenKind::LBrace),
			'}' => Some(TokenKind::RBrace),
			'[' => Some(TokenKind::LBracket),
			']' => Some(TokenKind::RBracket),
			_ => None,
		};
		if let Some(kind) = single
		{
			tokens.push(Token{ kind, position: TextPosition{line:line_number,column} });
			i += 1;
			continue;
		}
		if c.is_alphanumeric() || c=='_'
		{
			let start = i;
			while i<chars.len() && (chars[i].is_alphanumeric() || chars[i]=='_') { i += 1; }
			let text:String = chars[start..i].iter().collect();
			tokens.push(Token{ kind: TokenKind::Ident(text), position: TextPosition{line:line_number,column} });
			continue;
		}
		i += 1; //skip unrecognized punctuation rather than aborting on stray characters
	}
	tokens
}

fn parse_failure(position:TextPosition, message:impl Into<String>) -> Error
{
	error!(parse_failure).with_position(position).with_message(message.into())
}

struct LineTokens<'a>
{
	tokens: &'a [Token],
	cursor: usize,
}

impl<'a> LineTokens<'a>
{
	fn new(tokens:&'a [Token]) -> LineTokens<'a> { LineTokens{ tokens, cursor: 0 } }
	fn peek(&self) -> Option<&Token> { self.tokens.get(self.cursor) }
	fn next(&mut self) -> Option<&Token> { let t = self.tokens.get(self.cursor); self.cursor += 1; t }
	fn expect_ident(&mut self, line:usize) -> Result<String,Error>
	{
		match self.next()
		{
			Some(Token{kind:TokenKind::Ident(name),..}) => Ok(name.clone()),
			Some(t) => Err(parse_failure(t.position,"expected an identifier")),
			None => Err(parse_failure(TextPosition{line,column:1},"expected an identifier, found end of line")),
		}
	}
	fn expect(&mut self, kind:TokenKind, line:usize) -> Result<(),Error>
	{
		match self.next()
		{
			Some(t) if t.kind==kind => Ok(()),
			Some(t) => Err(parse_failure(t.position,format!("expected {:?}, found {:?}",kind,t.kind))),
			None => Err(parse_failure(TextPosition{line,column:1},format!("expected {:?}, found end of line",kind))),
		}
	}
}

fn layout_by_name(name:&str) -> Option<Layout>
{
	match name
	{
		"LineSegment" => Some(Layout::LineSegment),
		"Triangle" => Some(Layout::Triangle),
		"RightTriangle" => Some(Layout::RightTriangle),
		"Quadrilateral" => Some(Layout::Quadrilateral),
		"ExplicitLineAndPoint" => Some(Layout::ExplicitLineAndPoint),
		"ExplicitLineAndTwoPoints" => Some(Layout::ExplicitLineAndTwoPoints),
		_ => None,
	}
}

fn predefined_kind_by_name(name:&str) -> Option<PredefinedKind>
{
	use PredefinedKind::*;
	[Midpoint,LineFromPoints,IntersectionOfLines,PerpendicularLine,PerpendicularProjection,
		ParallelLine,AngleBisector,Circumcircle,IntersectionOfLineAndCircle,IntersectionOfCircles]
		.into_iter().find(|kind| kind.name()==name)
}

fn theorem_type_by_name(name:&str) -> Option<TheoremType>
{
	use TheoremType::*;
	[EqualLineSegments,CollinearPoints,ConcurrentLines,ConcyclicPoints,ParallelLines,
		PerpendicularLines,TangentCircles,LineTangentToCircle,EqualAngles]
		.into_iter().find(|t| t.to_string()==name)
}

///One non-comment, non-blank line together with its 1-indexed line number.
struct SourceLine { number: usize, text: String }

fn significant_lines(text:&str) -> Vec<SourceLine>
{
	text.lines().enumerate()
		.map(|(i,line)| SourceLine{ number: i+1, text: line.to_string() })
		.filter(|l| !l.text.trim().is_empty() && !l.text.trim_start().starts_with('#'))
		.collect()
}

///The parsed shape shared by a generator input and one template block: a
///layout-seeded configuration, the name each loose/constructed object was
///declared under, and the line it ended on.
struct ParsedBlock
{
	config: Configuration,
	names: HashMap<String,ObjectId>,
	next_line: usize,
}

///Parse the layout-declaration line and every following `<name> = <Ctor>(...)`
///line, stopping at the first line that isn't a constructed-object
///declaration (a `Rules:`/`Theorem:` line, a new block header, or EOF).
fn parse_configuration(lines:&[SourceLine], mut index:usize) -> Result<ParsedBlock,Error>
{
	let header = &lines[index];
	let tokens = tokenize_line(&header.text, header.number);
	let mut cursor = LineTokens::new(&tokens);
	let layout_name = cursor.expect_ident(header.number)?;
	let layout = layout_by_name(&layout_name)
		.ok_or_else(|| parse_failure(TextPosition{line:header.number,column:1}, format!("unknown layout '{}'",layout_name)))?;

	let mut config = Configuration::new_loose(layout);
	let mut names:HashMap<String,ObjectId> = HashMap::new();
	for &loose_id in &config.loose_ids
	{
		let name = cursor.expect_ident(header.number)?;
		names.insert(name, loose_id);
	}
	index += 1;

	while index < lines.len()
	{
		let line = &lines[index];
		let tokens = tokenize_line(&line.text, line.number);
		if tokens.is_empty() { index += 1; continue; }
		if matches!(tokens[0].kind, TokenKind::Ident(ref s) if s=="Rules" || s=="Theorem") { break; }
		//a new block header re-declares a layout name, not an assignment; stop.
		if tokens.len()>=2 && !matches!(tokens[1].kind, TokenKind::Equals) { break; }

		let mut cursor = LineTokens::new(&tokens);
		let object_name = cursor.expect_ident(line.number)?;
		cursor.expect(TokenKind::Equals, line.number)?;
		let construction_name = cursor.expect_ident(line.number)?;
		let kind = predefined_kind_by_name(&construction_name)
			.ok_or_else(|| parse_failure(TextPosition{line:line.number,column:1}, format!("unknown construction '{}'",construction_name)))?;
		cursor.expect(TokenKind::LParen, line.number)?;
		let mut arguments = Vec::new();
		loop
		{
			arguments.push(parse_argument(&mut cursor, &names, line.number)?);
			match cursor.next()
			{
				Some(t) if t.kind==TokenKind::Comma => continue,
				Some(t) if t.kind==TokenKind::RParen => break,
				Some(t) => return Err(parse_failure(t.position,"expected ',' or ')' in argument list")),
				None => return Err(parse_failure(TextPosition{line:line.number,column:1},"unterminated argument list")),
			}
		}

		let construction = Arc::new(Construction::Predefined(kind));
		let id = config.push_constructed(construction, arguments, 0)
			.map_err(|e| parse_failure(TextPosition{line:line.number,column:1}, format!("{}",e)))?;
		names.insert(object_name, id);
		index += 1;
	}

	Ok(ParsedBlock{ config, names, next_line: index })
}

fn parse_argument(cursor:&mut LineTokens, names:&HashMap<String,ObjectId>, line:usize) -> Result<ArgumentValue,Error>
{
	match cursor.peek().map(|t|t.kind.clone())
	{
		Some(TokenKind::LBrace) =>
		{
			cursor.next();
			let mut items = Vec::new();
			loop
			{
				items.push(parse_argument(cursor, names, line)?);
				match cursor.next()
				{
					Some(t) if t.kind==TokenKind::Comma => continue,
					Some(t) if t.kind==TokenKind::RBrace => break,
					Some(t) => return Err(parse_failure(t.position,"expected ',' or '}' inside a set argument")),
					None => return Err(parse_failure(TextPosition{line,column:1},"unterminated set argument")),
				}
			}
			Ok(ArgumentValue::new_set(items))
		},
		Some(TokenKind::Ident(name)) =>
		{
			cursor.next();
			let id = names.get(&name).copied()
				.ok_or_else(|| parse_failure(TextPosition{line,column:1}, format!("reference to undeclared object '{}'",name)))?;
			Ok(ArgumentValue::Object(id))
		},
		Some(_) | None =>
		{
			let position = cursor.peek().map(|t|t.position).unwrap_or(TextPosition{line,column:1});
			Err(parse_failure(position,"expected an object name or a '{' set argument"))
		},
	}
}

///A fully parsed generator input file.
pub struct ParsedInput
{
	pub layout: Layout,
	pub config: Configuration,
	pub rules: Vec<Arc<Construction>>,
	///The name every loose or constructed object of the initial
	///configuration was declared under, for the report writer.
	pub names: HashMap<String,ObjectId>,
}

pub fn parse_input(path:&Path) -> Result<ParsedInput,Error>
{
	let text = fs::read_to_string(path)
		.map_err(|e| error!(parse_failure).with_path(path.to_path_buf()).with_message(format!("could not read input file: {}",e)))?;
	let lines = significant_lines(&text);
	if lines.is_empty()
	{
		return Err(error!(parse_failure).with_path(path.to_path_buf()).with_message("empty input file".to_string()));
	}
	let block = parse_configuration(&lines,0).map_err(|e| e.with_path(path.to_path_buf()))?;

	let mut index = block.next_line;
	let starts_rules_block = index < lines.len()
		&& matches!(tokenize_line(&lines[index].text,lines[index].number).first().map(|t|t.kind.clone()), Some(TokenKind::Ident(ref s)) if s=="Rules");
	if !starts_rules_block
	{
		return Err(parse_failure(TextPosition{line: lines.get(index).map(|l|l.number).unwrap_or(lines.last().unwrap().number), column:1}, "expected a 'Rules:' block").with_path(path.to_path_buf()));
	}
	index += 1;

	let mut rules = Vec::new();
	while index < lines.len()
	{
		let line = &lines[index];
		let name = line.text.trim();
		let kind = predefined_kind_by_name(name)
			.ok_or_else(|| parse_failure(TextPosition{line:line.number,column:1}, format!("unknown construction '{}' in Rules block",name)).with_path(path.to_path_buf()))?;
		rules.push(Arc::new(Construction::Predefined(kind)));
		index += 1;
	}

	Ok(ParsedInput{ layout: block.config.layout, config: block.config, rules, names: block.names })
}

///One block of a template theorem file: the template configuration and the
///theorem it is declared to make true.
pub struct ParsedTemplateBlock
{
	pub config: Configuration,
	pub theorem: Theorem,
}

pub fn parse_template_file(path:&Path) -> Result<Vec<ParsedTemplateBlock>,Error>
{
	let text = fs::read_to_string(path)
		.map_err(|e| error!(parse_failure).with_path(path.to_path_buf()).with_message(format!("could not read template file: {}",e)))?;
	let lines = significant_lines(&text);
	let mut blocks = Vec::new();
	let mut index = 0;
	while index < lines.len()
	{
		//an optional bare numeric block header, e.g. "1:"
		let tokens = tokenize_line(&lines[index].text, lines[index].number);
		if tokens.len()==2 && matches!(tokens[0].kind, TokenKind::Ident(ref s) if s.chars().all(|c|c.is_ascii_digit())) && tokens[1].kind==TokenKind::Colon
		{
			index += 1;
		}
		let block = parse_configuration(&lines,index).map_err(|e| e.with_path(path.to_path_buf()))?;
		index = block.next_line;
		if index >= lines.len()
		{
			return Err(parse_failure(TextPosition{line:lines.last().unwrap().number,column:1}, "template block is missing its 'Theorem:' declaration").with_path(path.to_path_buf()));
		}
		let theorem_line = &lines[index];
		let theorem_tokens = tokenize_line(&theorem_line.text, theorem_line.number);
		let mut cursor = LineTokens::new(&theorem_tokens);
		let keyword = cursor.expect_ident(theorem_line.number)?;
		if keyword != "Theorem"
		{
			return Err(parse_failure(TextPosition{line:theorem_line.number,column:1}, "expected a 'Theorem:' declaration").with_path(path.to_path_buf()));
		}
		cursor.expect(TokenKind::Colon, theorem_line.number)?;
		let type_name = cursor.expect_ident(theorem_line.number)?;
		let theorem_type = theorem_type_by_name(&type_name)
			.ok_or_else(|| parse_failure(TextPosition{line:theorem_line.number,column:1}, format!("unknown theorem type '{}'",type_name)).with_path(path.to_path_buf()))?;
		cursor.expect(TokenKind::LParen, theorem_line.number)?;
		let mut objects = Vec::new();
		loop
		{
			objects.push(parse_theorem_object(&mut cursor, &block.config, &block.names, theorem_line.number)?);
			match cursor.next()
			{
				Some(t) if t.kind==TokenKind::Comma => continue,
				Some(t) if t.kind==TokenKind::RParen => break,
				Some(t) => return Err(parse_failure(t.position,"expected ',' or ')' in theorem object list").with_path(path.to_path_buf())),
				None => return Err(parse_failure(TextPosition{line:theorem_line.number,column:1},"unterminated theorem declaration").with_path(path.to_path_buf())),
			}
		}
		objects.sort();
		blocks.push(ParsedTemplateBlock{ config: block.config, theorem: Theorem{ theorem_type, objects } });
		index += 1;
	}
	Ok(blocks)
}

fn resolve_name(names:&HashMap<String,ObjectId>, name:&str, position:TextPosition) -> Result<ObjectId,Error>
{
	names.get(name).copied().ok_or_else(|| parse_failure(position, format!("reference to undeclared object '{}'",name)))
}

fn parse_line_ref(cursor:&mut LineTokens, names:&HashMap<String,ObjectId>, line:usize) -> Result<LineRef,Error>
{
	match cursor.peek().map(|t|t.kind.clone())
	{
		Some(TokenKind::LBracket) =>
		{
			cursor.next();
			let p = resolve_name(names,&cursor.expect_ident(line)?, TextPosition{line,column:1})?;
			cursor.expect(TokenKind::Comma, line)?;
			let q = resolve_name(names,&cursor.expect_ident(line)?, TextPosition{line,column:1})?;
			cursor.expect(TokenKind::RBracket, line)?;
			Ok(LineRef::ByPoints(p,q))
		},
		Some(TokenKind::Ident(name)) =>
		{
			cursor.next();
			Ok(LineRef::ByObject(resolve_name(names,&name,TextPosition{line,column:1})?))
		},
		_ => Err(parse_failure(TextPosition{line,column:1},"expected a line reference")),
	}
}

fn parse_theorem_object(cursor:&mut LineTokens, config:&Configuration, names:&HashMap<String,ObjectId>, line:usize) -> Result<TheoremObject,Error>
{
	match cursor.peek().map(|t|t.kind.clone())
	{
		Some(TokenKind::LBracket) =>
		{
			cursor.next();
			let mut ids = vec![resolve_name(names,&cursor.expect_ident(line)?, TextPosition{line,column:1})?];
			loop
			{
				match cursor.next()
				{
					Some(t) if t.kind==TokenKind::Comma => ids.push(resolve_name(names,&cursor.expect_ident(line)?, TextPosition{line,column:1})?),
					Some(t) if t.kind==TokenKind::RBracket => break,
					Some(t) => return Err(parse_failure(t.position,"expected ',' or ']' in a by-points reference")),
					None => return Err(parse_failure(TextPosition{line,column:1},"unterminated by-points reference")),
				}
			}
			match ids.len()
			{
				2 => Ok(TheoremObject::Line(LineRef::ByPoints(ids[0],ids[1]))),
				3 => Ok(TheoremObject::Circle(CircleRef::ByPoints(ids[0],ids[1],ids[2]))),
				n => Err(parse_failure(TextPosition{line,column:1}, format!("a by-points reference takes 2 or 3 points, found {}",n))),
			}
		},
		Some(TokenKind::LParen) =>
		{
			cursor.next();
			let l1 = parse_line_ref(cursor,names,line)?;
			cursor.expect(TokenKind::Comma, line)?;
			let l2 = parse_line_ref(cursor,names,line)?;
			cursor.expect(TokenKind::RParen, line)?;
			Ok(TheoremObject::Angle(l1,l2))
		},
		Some(TokenKind::Ident(name)) =>
		{
			cursor.next();
			let id = resolve_name(names,&name,TextPosition{line,column:1})?;
			if cursor.peek().map(|t|t.kind.clone())==Some(TokenKind::Dash)
			{
				cursor.next();
				let second_name = cursor.expect_ident(line)?;
				let second = resolve_name(names,&second_name,TextPosition{line,column:1})?;
				return Ok(TheoremObject::Segment(id,second));
			}
			Ok(match config.object_type(id)
			{
				ObjectType::Point => TheoremObject::Point(id),
				ObjectType::Line => TheoremObject::Line(LineRef::ByObject(id)),
				ObjectType::Circle => TheoremObject::Circle(CircleRef::ByObject(id)),
			})
		},
		_ => Err(parse_failure(TextPosition{line,column:1},"expected a theorem object")),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn tokenizes_a_construction_line()
	{
		let tokens = tokenize_line("M = Midpoint({A, B})", 1);
		let kinds:Vec<&TokenKind> = tokens.iter().map(|t|&t.kind).collect();
		assert_eq!(kinds, vec![
			&TokenKind::Ident("M".to_string()), &TokenKind::Equals, &TokenKind::Ident("Midpoint".to_string()),
			&TokenKind::LParen, &TokenKind::LBrace, &TokenKind::Ident("A".to_string()), &TokenKind::Comma,
			&TokenKind::Ident("B".to_string()), &TokenKind::RBrace, &TokenKind::RParen,
		]);
	}

	#[test]
	fn comments_and_blank_lines_are_skipped()
	{
		let text = "Triangle A B C\n\n# a comment\nRules:\nMidpoint\n";
		let lines = significant_lines(text);
		assert_eq!(lines.len(), 3);
	}

	#[test]
	fn parses_a_minimal_input_file() -> Result<(),Error>
	{
		let dir = std::env::temp_dir().join(format!("geotheorems-test-{}",std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let path = dir.join("triangle_midpoint.txt");
		fs::write(&path, "Triangle A B C\n\nRules:\nMidpoint\n").unwrap();
		let parsed = parse_input(&path)?;
		assert_eq!(parsed.layout, Layout::Triangle);
		assert_eq!(parsed.config.constructed_count(), 0);
		assert_eq!(parsed.rules.len(), 1);
		fs::remove_file(&path).ok();
		Ok(())
	}

	#[test]
	fn parses_a_construction_line_and_rejects_unknown_object()
	{
		let dir = std::env::temp_dir().join(format!("geotheorems-test2-{}",std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let path = dir.join("bad.txt");
		fs::write(&path, "Triangle A B C\nM = Midpoint({A, Z})\nRules:\nMidpoint\n").unwrap();
		let result = parse_input(&path);
		assert!(result.is_err());
		fs::remove_file(&path).ok();
	}
}
