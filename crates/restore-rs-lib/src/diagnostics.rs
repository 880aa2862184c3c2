//! Diagnostics raised while resolving and the sinks they are delivered to.

use std::collections::BTreeSet;
use serde::*;
use crate::library::LibraryName;

/// A diagnostic code, displayed as `NU1101`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogCode(u16);

impl LogCode {
	/// No provider has any version of the id.
	pub const NU1101: LogCode = LogCode(1101);
	/// Versions exist but none satisfy a requested range.
	pub const NU1102: LogCode = LogCode(1102);
	/// A project reference names an unknown project.
	pub const NU1104: LogCode = LogCode(1104);
	/// Dependency cycle.
	pub const NU1108: LogCode = LogCode(1108);
	/// A project does not support the target framework.
	pub const NU1201: LogCode = LogCode(1201);
	/// A package does not support the target framework.
	pub const NU1202: LogCode = LogCode(1202);
	/// The selected version is above the upper bound of a dependency's range.
	pub const NU1608: LogCode = LogCode(1608);

	pub fn new(number: u16) -> Self {
		Self(number)
	}

	pub fn number(&self) -> u16 {
		self.0
	}

	/// Parses a `;` or `,` separated list such as `NU1603;NU1605`, empty entries are skipped.
	pub fn parse_list(s: &str) -> crate::Result<BTreeSet<LogCode>> {
		s.split([';', ','])
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.map(str::parse)
			.collect()
	}
}

impl std::str::FromStr for LogCode {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let number = s.get(..2)
			.filter(|prefix| prefix.eq_ignore_ascii_case("nu"))
			.and_then(|_| s[2..].parse::<u16>().ok())
			.ok_or_else(|| crate::Error::Parse(format!("invalid log code `{}`", s)))?;
		Ok(LogCode(number))
	}
}

impl TryFrom<String> for LogCode {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<LogCode> for String {
	fn from(value: LogCode) -> Self {
		value.to_string()
	}
}

impl std::fmt::Display for LogCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "NU{}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
	Info,
	Warning,
	Error,
}

impl std::fmt::Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LogLevel::Info => write!(f, "info"),
			LogLevel::Warning => write!(f, "warning"),
			LogLevel::Error => write!(f, "error"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: LogCode,
	pub level: LogLevel,
	pub message: String,
	/// The package the diagnostic is about, warnings with one can be suppressed per package.
	pub library_id: Option<LibraryName>,
	pub target_graphs: Vec<String>,
}

impl Diagnostic {
	pub fn new(code: LogCode, level: LogLevel, message: String) -> Self {
		Self {
			code,
			level,
			message,
			library_id: None,
			target_graphs: Vec::new(),
		}
	}

	pub fn error(code: LogCode, message: String) -> Self {
		Self::new(code, LogLevel::Error, message)
	}

	pub fn warning(code: LogCode, message: String) -> Self {
		Self::new(code, LogLevel::Warning, message)
	}

	pub fn with_library(mut self, library_id: LibraryName) -> Self {
		self.library_id = Some(library_id);
		self
	}

	pub fn for_target(mut self, target: String) -> Self {
		self.target_graphs = vec![target];
		self
	}

	/// Same diagnostic apart from which targets raised it.
	pub fn is_same_report(&self, other: &Diagnostic) -> bool {
		self.code == other.code
		&& self.level == other.level
		&& self.message == other.message
		&& self.library_id == other.library_id
	}
}

impl std::fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}: {}", self.level, self.code, self.message)?;
		if !self.target_graphs.is_empty() {
			write!(f, " [{}]", self.target_graphs.join(", "))?;
		}
		Ok(())
	}
}

/// Receives the final diagnostics of a restore.
pub trait DiagnosticSink {
	fn log(&mut self, diagnostic: &Diagnostic);
}

/// Keeps every diagnostic it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
	pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for CollectingSink {
	fn log(&mut self, diagnostic: &Diagnostic) {
		self.diagnostics.push(diagnostic.clone());
	}
}
