// src/service/transition.rs
//
// Status-transition rules for repair tickets. Pure decision logic over a
// fixed graph; no I/O, safe to call from any thread.

use crate::models::ticketmodel::TicketStatus;

pub const VALID_PRIORITIES: [&str; 4] = ["low", "normal", "high", "urgent"];

/// Legal next statuses for each current status. Kept as static data so the
/// graph stays auditable and testable independently of orchestration; a new
/// status only extends this table.
pub fn valid_next_statuses(current: TicketStatus) -> &'static [TicketStatus] {
    use TicketStatus::*;
    match current {
        Pending => &[Diagnosed, InProgress, Cancelled],
        Diagnosed => &[InProgress, WaitingParts, Completed, ReadyPickup, Cancelled],
        InProgress => &[WaitingParts, Completed, ReadyPickup, Cancelled],
        WaitingParts => &[InProgress, Cancelled],
        Completed => &[ReadyPickup, Delivered],
        // Customer wants additional work
        ReadyPickup => &[Delivered, InProgress],
        Delivered => &[],
        Cancelled => &[],
    }
}

/// Identity transitions are always valid (idempotent update); otherwise the
/// adjacency table decides.
pub fn is_valid_transition(current: TicketStatus, new: TicketStatus) -> bool {
    if current == new {
        return true;
    }
    valid_next_statuses(current).contains(&new)
}

/// True unless the ticket is in a final state.
pub fn is_ticket_actionable(status: TicketStatus) -> bool {
    !valid_next_statuses(status).is_empty()
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// No outbound edges exist from the current status.
    FinalState { current: TicketStatus },
    /// The edge current -> proposed is not in the graph.
    NotAllowed {
        current: TicketStatus,
        proposed: TicketStatus,
        allowed: &'static [TicketStatus],
    },
}

impl TransitionError {
    pub fn message(&self) -> String {
        match self {
            TransitionError::FinalState { current } => format!(
                "Ticket in '{}' status cannot be changed (final state)",
                current.to_str()
            ),
            TransitionError::NotAllowed {
                current,
                proposed,
                allowed,
            } => {
                let valid_list = allowed
                    .iter()
                    .map(|s| s.to_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Cannot transition from '{}' to '{}'. Valid next statuses: {}",
                    current.to_str(),
                    proposed.to_str(),
                    valid_list
                )
            }
        }
    }

    pub fn allowed(&self) -> &'static [TicketStatus] {
        match self {
            TransitionError::FinalState { .. } => &[],
            TransitionError::NotAllowed { allowed, .. } => allowed,
        }
    }
}

pub fn validate_transition(
    current: TicketStatus,
    proposed: TicketStatus,
) -> Result<(), TransitionError> {
    if is_valid_transition(current, proposed) {
        return Ok(());
    }

    let allowed = valid_next_statuses(current);
    if allowed.is_empty() {
        Err(TransitionError::FinalState { current })
    } else {
        Err(TransitionError::NotAllowed {
            current,
            proposed,
            allowed,
        })
    }
}

pub fn validate_priority(priority: &str) -> bool {
    VALID_PRIORITIES.contains(&priority.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use TicketStatus::*;

    // The full adjacency table, mirrored here so every pair is checked.
    fn expected_edges(current: TicketStatus) -> Vec<TicketStatus> {
        match current {
            Pending => vec![Diagnosed, InProgress, Cancelled],
            Diagnosed => vec![InProgress, WaitingParts, Completed, ReadyPickup, Cancelled],
            InProgress => vec![WaitingParts, Completed, ReadyPickup, Cancelled],
            WaitingParts => vec![InProgress, Cancelled],
            Completed => vec![ReadyPickup, Delivered],
            ReadyPickup => vec![Delivered, InProgress],
            Delivered => vec![],
            Cancelled => vec![],
        }
    }

    #[test]
    fn every_pair_matches_the_adjacency_table() {
        for current in TicketStatus::ALL {
            let edges = expected_edges(current);
            for proposed in TicketStatus::ALL {
                let expected = current == proposed || edges.contains(&proposed);
                assert_eq!(
                    is_valid_transition(current, proposed),
                    expected,
                    "{:?} -> {:?}",
                    current,
                    proposed
                );
            }
        }
    }

    #[test]
    fn identity_transitions_are_always_valid() {
        for status in TicketStatus::ALL {
            assert!(is_valid_transition(status, status), "{:?}", status);
            assert!(validate_transition(status, status).is_ok());
        }
    }

    #[test]
    fn terminal_states_have_no_outbound_edges() {
        assert!(valid_next_statuses(Delivered).is_empty());
        assert!(valid_next_statuses(Cancelled).is_empty());
        assert!(!is_ticket_actionable(Delivered));
        assert!(!is_ticket_actionable(Cancelled));
    }

    #[test]
    fn non_terminal_states_are_actionable() {
        for status in [Pending, Diagnosed, InProgress, WaitingParts, Completed, ReadyPickup] {
            assert!(is_ticket_actionable(status), "{:?}", status);
        }
    }

    #[test]
    fn final_state_rejection_is_distinct() {
        let err = validate_transition(Delivered, Cancelled).unwrap_err();
        assert_eq!(err, TransitionError::FinalState { current: Delivered });
        assert!(err.message().contains("final state"));
        assert!(err.allowed().is_empty());
    }

    #[test]
    fn rejection_lists_the_allowed_set() {
        let err = validate_transition(Pending, Delivered).unwrap_err();
        match &err {
            TransitionError::NotAllowed { allowed, .. } => {
                assert_eq!(*allowed, &[Diagnosed, InProgress, Cancelled]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let msg = err.message();
        assert!(msg.contains("'pending'"));
        assert!(msg.contains("'delivered'"));
        assert!(msg.contains("diagnosed, in_progress, cancelled"));
    }

    #[test]
    fn diagnosed_rejection_carries_full_allowed_set() {
        let err = validate_transition(Diagnosed, Pending).unwrap_err();
        assert_eq!(
            err.allowed(),
            &[InProgress, WaitingParts, Completed, ReadyPickup, Cancelled]
        );
    }

    #[test]
    fn priority_validation_is_case_insensitive() {
        assert!(validate_priority("low"));
        assert!(validate_priority("Normal"));
        assert!(validate_priority("HIGH"));
        assert!(validate_priority("urgent"));
        assert!(!validate_priority("critical"));
        assert!(!validate_priority(""));
    }
}
