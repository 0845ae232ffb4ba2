/*!

The error taxonomy of geotheorems. All distinct error kinds from the design are
represented as a single `ErrorKind`, carried inside an `Error` together with
the source location of its construction and an optional human message.

Construct values with the `error!` macro, e.g. `error!(parse_failure)` or
`error!(signature_mismatch, construction_name)`, and attach context with
`.with_message(..)`.

*/

use std::fmt;
use std::path::PathBuf;

///A (line,column) position inside a parsed text file, 1-indexed.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct TextPosition
{
	pub line: usize,
	pub column: usize,
}

///Where in the geotheorems source an `Error` was raised. Useful when a bug
///report needs to point at the offending `error!` call site rather than at
///the user-facing message alone.
#[derive(Clone,Copy,Debug)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
}

///Capture the call site. Mirrors the shape implied by `source_location!()` at
///every `error!(..)` call in the configuration evaluator.
#[macro_export]
macro_rules! source_location
{
	() => {
		$crate::error::SourceLocation{ file: file!(), line: line!() }
	};
}

///The distinct error kinds of §7. `InconstructibleObject` and `DuplicateObject`
///are not failures of the run; they are pruning outcomes that still travel
///through `Result` so every constructor has one uniform error channel.
#[derive(Clone,Debug,PartialEq)]
pub enum ErrorKind
{
	ParseFailure,
	SignatureMismatch,
	AnalyticFailure,
	InconsistentPictures,
	UnresolvedInconsistency,
	InconstructibleObject,
	DuplicateObject,
	AnalysisTimeout,
	UnhandledFeedbackKind,
	IllFormedConfiguration,
	BadArgument,
}

impl fmt::Display for ErrorKind
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		let name = match self
		{
			ErrorKind::ParseFailure => "parse-failure",
			ErrorKind::SignatureMismatch => "signature-mismatch",
			ErrorKind::AnalyticFailure => "analytic-failure",
			ErrorKind::InconsistentPictures => "inconsistent-pictures",
			ErrorKind::UnresolvedInconsistency => "unresolved-inconsistency",
			ErrorKind::InconstructibleObject => "inconstructible-object",
			ErrorKind::DuplicateObject => "duplicate-object",
			ErrorKind::AnalysisTimeout => "analysis-timeout",
			ErrorKind::UnhandledFeedbackKind => "unhandled-feedback-kind",
			ErrorKind::IllFormedConfiguration => "ill-formed-configuration",
			ErrorKind::BadArgument => "bad-argument",
		};
		write!(f,"{}",name)
	}
}

#[derive(Clone,Debug)]
pub struct Error
{
	pub kind: ErrorKind,
	pub location: SourceLocation,
	pub message: Option<String>,
	///Set by the parser for `ParseFailure`, giving a reproducible pointer into the offending file.
	pub position: Option<TextPosition>,
	pub path: Option<PathBuf>,
}

impl Error
{
	pub fn new(kind:ErrorKind, location:SourceLocation) -> Error
	{
		Error{ kind, location, message:None, position:None, path:None }
	}
	pub fn with_message(mut self, message:String) -> Error
	{
		self.message = Some(message);
		self
	}
	pub fn with_position(mut self, position:TextPosition) -> Error
	{
		self.position = Some(position);
		self
	}
	pub fn with_path(mut self, path:PathBuf) -> Error
	{
		self.path = Some(path);
		self
	}
	///Whether this error represents a normal pruning outcome rather than a run failure.
	pub fn is_pruning_outcome(&self) -> bool
	{
		matches!(self.kind, ErrorKind::InconstructibleObject | ErrorKind::DuplicateObject)
	}
}

impl fmt::Display for Error
{
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result
	{
		write!(f,"{}",self.kind)?;
		if let Some(ref path) = self.path
		{
			write!(f," in {}",path.display())?;
		}
		if let Some(position) = self.position
		{
			write!(f," at {}:{}",position.line,position.column)?;
		}
		if let Some(ref message) = self.message
		{
			write!(f,": {}",message)?;
		}
		write!(f," ({}:{})",self.location.file,self.location.line)
	}
}

impl std::error::Error for Error {}

///Build an `Error` of the given kind, capturing the call site.
#[macro_export]
macro_rules! error
{
	($kind:ident) => {
		$crate::error::Error::new($crate::error::ErrorKind_from_ident!($kind), $crate::source_location!())
	};
}

///Internal helper turning a bare identifier arm into an `ErrorKind` variant.
///Kept as a separate macro so `error!` reads the same at every call site as it
///does throughout the configuration evaluator.
#[macro_export]
macro_rules! ErrorKind_from_ident
{
	(parse_failure) => { $crate::error::ErrorKind::ParseFailure };
	(signature_mismatch) => { $crate::error::ErrorKind::SignatureMismatch };
	(analytic_failure) => { $crate::error::ErrorKind::AnalyticFailure };
	(inconsistent_pictures) => { $crate::error::ErrorKind::InconsistentPictures };
	(unresolved_inconsistency) => { $crate::error::ErrorKind::UnresolvedInconsistency };
	(inconstructible_object) => { $crate::error::ErrorKind::InconstructibleObject };
	(duplicate_object) => { $crate::error::ErrorKind::DuplicateObject };
	(analysis_timeout) => { $crate::error::ErrorKind::AnalysisTimeout };
	(unhandled_feedback_kind) => { $crate::error::ErrorKind::UnhandledFeedbackKind };
	(ill_formed_configuration) => { $crate::error::ErrorKind::IllFormedConfiguration };
	(bad_argument) => { $crate::error::ErrorKind::BadArgument };
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn display_includes_kind_and_message()
	{
		let e = error!(bad_argument).with_message(String::from("missing seed"));
		let text = format!("{}",e);
		assert!(text.starts_with("bad-argument"));
		assert!(text.contains("missing seed"));
	}

	#[test]
	fn pruning_outcomes_are_recognised()
	{
		assert!(error!(inconstructible_object).is_pruning_outcome());
		assert!(error!(duplicate_object).is_pruning_outcome());
		assert!(!error!(parse_failure).is_pruning_outcome());
	}
}
