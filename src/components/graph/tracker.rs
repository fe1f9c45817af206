use std::collections::HashMap;

/// Proof that a request was issued for a target at a given generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
	/// Element id the request draws into.
	pub target: String,
	/// Generation of `target` when the request was issued.
	pub generation: u64,
}

/// Per-target request generations. Only the newest ticket for a target may
/// render; anything older answered too late.
#[derive(Debug, Default)]
pub struct RequestTracker {
	generations: HashMap<String, u64>,
}

impl RequestTracker {
	/// Start a request for `target`, superseding any earlier ticket.
	pub fn begin(&mut self, target: &str) -> Ticket {
		let generation = self.bump(target);
		Ticket {
			target: target.to_string(),
			generation,
		}
	}

	/// Drop every outstanding ticket for `target`, e.g. after clearing it.
	pub fn invalidate(&mut self, target: &str) {
		self.bump(target);
	}

	/// Whether no newer request or clear happened for the ticket's target.
	pub fn is_current(&self, ticket: &Ticket) -> bool {
		self.generations.get(&ticket.target) == Some(&ticket.generation)
	}

	fn bump(&mut self, target: &str) -> u64 {
		let generation = self.generations.entry(target.to_string()).or_insert(0);
		*generation += 1;
		*generation
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_ticket_supersedes_older() {
		let mut tracker = RequestTracker::default();
		let first = tracker.begin("datasetsGraph");
		let second = tracker.begin("datasetsGraph");
		assert!(!tracker.is_current(&first));
		assert!(tracker.is_current(&second));
	}

	#[test]
	fn targets_are_independent() {
		let mut tracker = RequestTracker::default();
		let counter = tracker.begin("speciesCounterGraph");
		let progress = tracker.begin("speciesProgressGraph");
		assert!(tracker.is_current(&counter));
		assert!(tracker.is_current(&progress));
	}

	#[test]
	fn invalidate_discards_in_flight_ticket() {
		let mut tracker = RequestTracker::default();
		let ticket = tracker.begin("issueFlagsCounterGraph");
		tracker.invalidate("issueFlagsCounterGraph");
		assert!(!tracker.is_current(&ticket));
	}
}
