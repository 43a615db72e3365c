// src/service/lifecycle.rs
//
// Orchestrates ticket updates: validate fully against the transition rules,
// then commit the mutation, the history row and the customer notification as
// one unit of work.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{db::DBClient, ticketdb::TicketExt},
    dtos::ticketdtos::UpdateTicketDto,
    models::ticketmodel::{Ticket, TicketStatus},
    service::{
        error::ServiceError,
        transition::{validate_priority, validate_transition},
    },
};

/// Everything a status-changing update must persist besides the ticket row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub old_status: TicketStatus,
    pub new_status: TicketStatus,
    pub changed_by: String,
    pub notes: Option<String>,
    pub notification_message: String,
}

/// A fully validated update, ready to be committed in one transaction.
/// Building the plan performs no I/O, so validation is complete before any
/// mutation is attempted. `expected_status` is the status the validation ran
/// against; the commit is guarded on it so a concurrent update cannot slip a
/// transition past the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketUpdatePlan {
    pub ticket_id: i64,
    pub customer_id: Uuid,
    pub expected_status: TicketStatus,
    pub status: TicketStatus,
    pub priority: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub notes: Option<String>,
    pub stamp_completed_at: bool,
    pub status_change: Option<StatusChange>,
}

pub fn build_update_plan(
    ticket: &Ticket,
    update: &UpdateTicketDto,
    actor: &str,
) -> Result<TicketUpdatePlan, ServiceError> {
    if let Some(new_status) = update.status {
        validate_transition(ticket.status, new_status)
            .map_err(ServiceError::InvalidTransition)?;
    }

    let priority = match &update.priority {
        Some(p) => {
            if !validate_priority(p) {
                return Err(ServiceError::InvalidPriority(p.clone()));
            }
            Some(p.to_lowercase())
        }
        None => None,
    };

    let new_status = update.status.unwrap_or(ticket.status);

    // Stamped once, on first reaching completed/delivered; never reset.
    let stamp_completed_at = matches!(
        new_status,
        TicketStatus::Completed | TicketStatus::Delivered
    ) && ticket.completed_at.is_none();

    let status_change = match update.status {
        Some(proposed) if proposed != ticket.status => Some(StatusChange {
            old_status: ticket.status,
            new_status: proposed,
            changed_by: actor.to_string(),
            notes: update.notes.clone(),
            notification_message: format!(
                "Your ticket #{} status has been updated from '{}' to '{}'.",
                ticket.id,
                ticket.status.to_str(),
                proposed.to_str()
            ),
        }),
        _ => None,
    };

    Ok(TicketUpdatePlan {
        ticket_id: ticket.id,
        customer_id: ticket.customer_id,
        expected_status: ticket.status,
        status: new_status,
        priority,
        estimated_cost: update.estimated_cost,
        actual_cost: update.actual_cost,
        notes: update.notes.clone(),
        stamp_completed_at,
        status_change,
    })
}

#[derive(Debug, Clone)]
pub struct LifecycleService {
    db_client: Arc<DBClient>,
}

impl LifecycleService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Apply a partial update to a ticket. Validation happens entirely before
    /// the mutation; the ticket row, history row and notification commit
    /// atomically.
    pub async fn apply_update(
        &self,
        ticket_id: i64,
        update: &UpdateTicketDto,
        actor: &str,
    ) -> Result<Ticket, ServiceError> {
        let ticket = self
            .db_client
            .get_ticket(ticket_id)
            .await?
            .ok_or(ServiceError::TicketNotFound(ticket_id))?;

        let plan = build_update_plan(&ticket, update, actor)?;
        let updated = self
            .db_client
            .apply_ticket_update(&plan)
            .await?
            .ok_or(ServiceError::ConcurrentUpdate(ticket_id))?;

        if let Some(change) = &plan.status_change {
            tracing::info!(
                "ticket {} moved {} -> {} by {}",
                ticket_id,
                change.old_status.to_str(),
                change.new_status.to_str(),
                change.changed_by
            );
        }

        Ok(updated)
    }

    /// Apply a status change to many tickets, each under its own atomic unit.
    /// Failures do not abort the remainder; every per-id outcome is logged so
    /// the aggregate count is never the only record of what happened.
    pub async fn bulk_apply_status(
        &self,
        ticket_ids: &[i64],
        new_status: TicketStatus,
        actor: &str,
    ) -> Result<usize, ServiceError> {
        let update = UpdateTicketDto {
            status: Some(new_status),
            ..Default::default()
        };

        let mut updated_count = 0;
        for &ticket_id in ticket_ids {
            match self.apply_update(ticket_id, &update, actor).await {
                Ok(_) => {
                    updated_count += 1;
                    tracing::debug!("bulk update: ticket {} set to {}", ticket_id, new_status.to_str());
                }
                Err(ServiceError::TicketNotFound(_)) => {
                    tracing::warn!("bulk update: ticket {} not found, skipped", ticket_id);
                }
                Err(ServiceError::InvalidTransition(err)) => {
                    tracing::warn!("bulk update: ticket {} skipped: {}", ticket_id, err.message());
                }
                Err(ServiceError::ConcurrentUpdate(_)) => {
                    tracing::warn!(
                        "bulk update: ticket {} changed concurrently, skipped",
                        ticket_id
                    );
                }
                Err(other) => return Err(other),
            }
        }

        Ok(updated_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use TicketStatus::*;

    fn ticket_in(status: TicketStatus) -> Ticket {
        Ticket {
            id: 7,
            customer_id: Uuid::new_v4(),
            device_id: 1,
            status,
            priority: "normal".to_string(),
            estimated_cost: Some(120.0),
            actual_cost: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: None,
        }
    }

    fn status_update(status: TicketStatus) -> UpdateTicketDto {
        UpdateTicketDto {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn valid_status_change_produces_exactly_one_history_entry() {
        let ticket = ticket_in(Pending);
        let plan = build_update_plan(&ticket, &status_update(Diagnosed), "admin").unwrap();

        let change = plan.status_change.expect("status change expected");
        assert_eq!(change.old_status, Pending);
        assert_eq!(change.new_status, Diagnosed);
        assert_eq!(change.changed_by, "admin");
        assert_eq!(
            change.notification_message,
            "Your ticket #7 status has been updated from 'pending' to 'diagnosed'."
        );
    }

    #[test]
    fn noop_status_update_produces_no_history_or_notification() {
        let ticket = ticket_in(Diagnosed);
        let plan = build_update_plan(&ticket, &status_update(Diagnosed), "admin").unwrap();

        assert!(plan.status_change.is_none());
        assert_eq!(plan.status, Diagnosed);
    }

    #[test]
    fn update_without_status_leaves_status_untouched() {
        let ticket = ticket_in(InProgress);
        let update = UpdateTicketDto {
            actual_cost: Some(99.5),
            notes: Some("replaced screen".to_string()),
            ..Default::default()
        };
        let plan = build_update_plan(&ticket, &update, "admin").unwrap();

        assert_eq!(plan.status, InProgress);
        assert!(plan.status_change.is_none());
        assert_eq!(plan.actual_cost, Some(99.5));
        assert_eq!(plan.notes.as_deref(), Some("replaced screen"));
    }

    #[test]
    fn invalid_transition_is_rejected_with_allowed_set() {
        let ticket = ticket_in(Pending);
        let err = build_update_plan(&ticket, &status_update(Delivered), "admin").unwrap_err();

        assert_eq!(
            err.allowed_statuses(),
            Some(&[Diagnosed, InProgress, Cancelled][..])
        );
    }

    #[test]
    fn diagnosed_to_delivered_is_rejected_listing_five_statuses() {
        let ticket = ticket_in(Diagnosed);
        let err = build_update_plan(&ticket, &status_update(Delivered), "admin").unwrap_err();

        assert_eq!(
            err.allowed_statuses(),
            Some(&[InProgress, WaitingParts, Completed, ReadyPickup, Cancelled][..])
        );
    }

    #[test]
    fn delivered_ticket_cannot_be_changed_at_all() {
        let ticket = ticket_in(Delivered);
        for proposed in TicketStatus::ALL {
            if proposed == Delivered {
                continue;
            }
            let err = build_update_plan(&ticket, &status_update(proposed), "admin").unwrap_err();
            assert!(err.to_string().contains("final state"), "{:?}", proposed);
        }
    }

    #[test]
    fn completed_at_is_stamped_on_first_completion() {
        let ticket = ticket_in(InProgress);
        let plan = build_update_plan(&ticket, &status_update(Completed), "admin").unwrap();
        assert!(plan.stamp_completed_at);
    }

    #[test]
    fn completed_at_is_stamped_on_delivery_if_unset() {
        // completed -> delivered with completed_at already set: stays stable
        let mut ticket = ticket_in(Completed);
        ticket.completed_at = Some(Utc::now());
        let plan = build_update_plan(&ticket, &status_update(Delivered), "admin").unwrap();
        assert!(!plan.stamp_completed_at);

        // completed -> delivered with completed_at never set: stamped now
        let ticket = ticket_in(Completed);
        let plan = build_update_plan(&ticket, &status_update(Delivered), "admin").unwrap();
        assert!(plan.stamp_completed_at);
    }

    #[test]
    fn plan_commits_against_the_status_it_validated() {
        // A concurrent writer that moves the ticket first must invalidate
        // this plan at commit time, so the guard carries the loaded status.
        let ticket = ticket_in(Pending);
        let plan = build_update_plan(&ticket, &status_update(Diagnosed), "admin").unwrap();
        assert_eq!(plan.expected_status, Pending);

        // Field-only updates are guarded the same way.
        let ticket = ticket_in(InProgress);
        let update = UpdateTicketDto {
            actual_cost: Some(50.0),
            ..Default::default()
        };
        let plan = build_update_plan(&ticket, &update, "admin").unwrap();
        assert_eq!(plan.expected_status, InProgress);
    }

    #[test]
    fn non_final_status_does_not_stamp_completed_at() {
        let ticket = ticket_in(Pending);
        let plan = build_update_plan(&ticket, &status_update(Diagnosed), "admin").unwrap();
        assert!(!plan.stamp_completed_at);
    }

    #[test]
    fn priority_is_validated_and_normalized() {
        let ticket = ticket_in(Pending);

        let update = UpdateTicketDto {
            priority: Some("URGENT".to_string()),
            ..Default::default()
        };
        let plan = build_update_plan(&ticket, &update, "admin").unwrap();
        assert_eq!(plan.priority.as_deref(), Some("urgent"));

        let update = UpdateTicketDto {
            priority: Some("critical".to_string()),
            ..Default::default()
        };
        let err = build_update_plan(&ticket, &update, "admin").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPriority(_)));
        assert_eq!(
            err.valid_priorities(),
            Some(&["low", "normal", "high", "urgent"][..])
        );
    }

    #[test]
    fn validation_rejects_before_any_field_is_applied() {
        // A bad transition combined with otherwise-valid fields fails whole.
        let ticket = ticket_in(WaitingParts);
        let update = UpdateTicketDto {
            status: Some(Delivered),
            actual_cost: Some(10.0),
            ..Default::default()
        };
        assert!(build_update_plan(&ticket, &update, "admin").is_err());
    }
}
