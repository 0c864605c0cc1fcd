//! Notification engine.
//!
//! A single writer plus a handful of event functions that compute a
//! recipient set and call the writer once per recipient. Every event
//! function is best-effort: failures are logged and swallowed so they never
//! affect the outcome of the transaction that triggered them.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::notification::{preview, CreateNotification, NotificationType};
use crate::models::user::UserSummary;
use crate::notifier::Notifier;
use crate::repositories::{NotificationRepository, TicketFollowerRepository, UserRepository};
use sqlx::PgPool;

async fn write(pool: &PgPool, user_id: Uuid, notification_type: NotificationType, message: String, ticket_id: Option<Uuid>) {
    let title = notification_type.title().to_string();
    let input = CreateNotification {
        user_id,
        notification_type,
        title,
        message,
        ticket_id,
    };

    if let Err(err) = NotificationRepository::create(pool, input).await {
        tracing::warn!(error = %err, user_id = %user_id, "failed to write notification");
    }
}

/// Also attempt an outbound SMS/email via the injected [`Notifier`]; failures
/// are non-fatal and only logged.
async fn write_and_notify(
    pool: &PgPool,
    notifier: &dyn Notifier,
    recipient_address: &str,
    user_id: Uuid,
    notification_type: NotificationType,
    message: String,
    ticket_id: Option<Uuid>,
) {
    write(pool, user_id, notification_type, message.clone(), ticket_id).await;
    notifier.send(recipient_address, &message).await;
}

pub async fn ticket_created(
    pool: &PgPool,
    notifier: &dyn Notifier,
    reporter_id: Uuid,
    reporter_phone: &str,
    ticket_id: Uuid,
    ticket_title: &str,
) {
    let message = format!("Your ticket \"{}\" was submitted.", preview(ticket_title));
    write_and_notify(
        pool,
        notifier,
        reporter_phone,
        reporter_id,
        NotificationType::TicketCreated,
        message,
        Some(ticket_id),
    )
    .await;
}

pub async fn new_ticket_for_team(
    pool: &PgPool,
    team_id: Uuid,
    reporter_id: Uuid,
    ticket_id: Uuid,
    ticket_title: &str,
) {
    let support = match UserRepository::list_support_by_team(pool, team_id).await {
        Ok(users) => users,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load team support members for notification");
            return;
        }
    };

    let message = format!("New ticket for your team: \"{}\".", preview(ticket_title));
    for member in support.into_iter().filter(|u| u.id != reporter_id) {
        write(pool, member.id, NotificationType::NewTicketForTeam, message.clone(), Some(ticket_id)).await;
    }
}

pub async fn ticket_status_changed(
    pool: &PgPool,
    reporter_id: Uuid,
    actor_id: Uuid,
    ticket_id: Uuid,
    new_status_label: &str,
) {
    let message = format!("Ticket status changed to {}.", new_status_label);
    let mut notified: HashSet<Uuid> = HashSet::new();

    if reporter_id != actor_id {
        write(pool, reporter_id, NotificationType::TicketStatusChanged, message.clone(), Some(ticket_id)).await;
        notified.insert(reporter_id);
    }

    let followers = match TicketFollowerRepository::list_follower_users(pool, ticket_id).await {
        Ok(f) => f,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load followers for notification");
            return;
        }
    };

    for follower in followers {
        if follower.id == reporter_id || follower.id == actor_id || notified.contains(&follower.id) {
            continue;
        }
        write(pool, follower.id, NotificationType::TicketStatusChanged, message.clone(), Some(ticket_id)).await;
        notified.insert(follower.id);
    }
}

pub async fn comment_added(
    pool: &PgPool,
    reporter_id: Uuid,
    author_id: Uuid,
    team_id: Option<Uuid>,
    ticket_id: Uuid,
    content: &str,
) {
    let message = format!("New comment: \"{}\"", preview(content));
    let mut notified: HashSet<Uuid> = HashSet::new();
    notified.insert(author_id);

    if reporter_id != author_id {
        write(pool, reporter_id, NotificationType::CommentAdded, message.clone(), Some(ticket_id)).await;
        notified.insert(reporter_id);
    }

    let followers = match TicketFollowerRepository::list_follower_users(pool, ticket_id).await {
        Ok(f) => f,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load followers for notification");
            Vec::<UserSummary>::new()
        }
    };

    for follower in followers {
        if notified.contains(&follower.id) {
            continue;
        }
        write(pool, follower.id, NotificationType::CommentAdded, message.clone(), Some(ticket_id)).await;
        notified.insert(follower.id);
    }

    if let Some(team_id) = team_id {
        let support = match UserRepository::list_support_by_team(pool, team_id).await {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load team support for notification");
                Vec::<UserSummary>::new()
            }
        };

        for member in support {
            if notified.contains(&member.id) {
                continue;
            }
            write(pool, member.id, NotificationType::CommentAdded, message.clone(), Some(ticket_id)).await;
            notified.insert(member.id);
        }
    }
}

pub async fn ticket_assigned(pool: &PgPool, team_id: Uuid, reporter_id: Uuid, ticket_id: Uuid, ticket_title: &str) {
    let support = match UserRepository::list_support_by_team(pool, team_id).await {
        Ok(users) => users,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load team support for notification");
            return;
        }
    };

    let message = format!("Ticket \"{}\" assigned to your team.", preview(ticket_title));
    for member in support.into_iter().filter(|u| u.id != reporter_id) {
        write(pool, member.id, NotificationType::TicketAssigned, message.clone(), Some(ticket_id)).await;
    }
}

pub async fn escalation_requested(pool: &PgPool, ticket_id: Uuid, reason: &str) {
    let managers = match UserRepository::list_managers(pool).await {
        Ok(m) => m,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load managers for notification");
            return;
        }
    };

    let message = format!("Escalation requested: \"{}\"", preview(reason));
    for manager in managers {
        write(pool, manager.id, NotificationType::EscalationRequested, message.clone(), Some(ticket_id)).await;
    }
}

pub async fn escalation_reviewed(pool: &PgPool, reporter_id: Uuid, ticket_id: Uuid, approved: bool) {
    let (notification_type, message) = if approved {
        (NotificationType::EscalationApproved, "Your escalation was approved.".to_string())
    } else {
        (NotificationType::EscalationRejected, "Your escalation was rejected.".to_string())
    };
    write(pool, reporter_id, notification_type, message, Some(ticket_id)).await;
}

pub async fn ticket_followed(pool: &PgPool, reporter_id: Uuid, follower_id: Uuid, ticket_id: Uuid) {
    if reporter_id == follower_id {
        return;
    }
    write(pool, reporter_id, NotificationType::TicketFollowed, "A new follower joined your ticket.".to_string(), Some(ticket_id)).await;
}
