//! Detects re-entry into a library that is still being walked.

use std::collections::HashSet;

use crate::library::*;

#[derive(Debug, Default)]
pub struct CycleGuard {
	stack: Vec<LibraryIdentity>,
	on_stack: HashSet<LibraryName>,
	reported: HashSet<Vec<LibraryIdentity>>,
}

impl CycleGuard {
	pub fn enter(&mut self, identity: LibraryIdentity) {
		self.on_stack.insert(identity.name.clone());
		self.stack.push(identity);
	}

	pub fn leave(&mut self) -> Option<LibraryIdentity> {
		let identity = self.stack.pop()?;
		self.on_stack.remove(&identity.name);
		Some(identity)
	}

	pub fn is_on_stack(&self, name: &LibraryName) -> bool {
		self.on_stack.contains(name)
	}

	/// Records the back edge from the top of the stack to `name`.
	///
	/// Returns the cycle, rotated to start at its smallest identity, the first time that cycle is seen.
	pub fn record_cycle(&mut self, name: &LibraryName) -> Option<Vec<LibraryIdentity>> {
		let start = self.stack.iter().rposition(|i| &i.name == name)?;
		let mut cycle = self.stack[start..].to_vec();
		let smallest = cycle.iter()
			.enumerate()
			.min_by(|(_, a), (_, b)| a.cmp(b))
			.map_or(0, |(i, _)| i);
		cycle.rotate_left(smallest);
		self.reported.insert(cycle.clone()).then_some(cycle)
	}
}

/// `a 1.0.0 -> b 1.0.0 -> a 1.0.0`
pub fn describe_cycle(cycle: &[LibraryIdentity]) -> String {
	cycle.iter()
		.chain(cycle.first())
		.map(|i| i.to_string())
		.collect::<Vec<_>>()
		.join(" -> ")
}
