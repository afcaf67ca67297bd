//! Then steps for lead synchronisation scenarios.

use super::world::LeadSyncWorld;
use eyre::{WrapErr, eyre};
use lead_relay::lead::{
    domain::{ListId, RemoteTaskSummary, SyncOutcome},
    services::RelayReport,
};
use rstest_bdd_macros::then;

fn created_task(world: &LeadSyncWorld) -> Result<&RemoteTaskSummary, eyre::Report> {
    match world.last_report.as_ref() {
        Some(RelayReport::Created(Some(task))) => Ok(task),
        other => Err(eyre!("expected a created task, got {other:?}")),
    }
}

fn delete_outcome(world: &LeadSyncWorld) -> Result<&SyncOutcome, eyre::Report> {
    match world.last_report.as_ref() {
        Some(RelayReport::Deleted(Some(outcome))) => Ok(outcome),
        other => Err(eyre!("expected a delete outcome, got {other:?}")),
    }
}

fn list_id(raw: &str) -> Result<ListId, eyre::Report> {
    ListId::parse(raw).ok_or_else(|| eyre!("blank list id"))
}

#[then(r#"a task is created in list "{list}""#)]
fn task_created_in_list(world: &mut LeadSyncWorld, list: String) -> Result<(), eyre::Report> {
    let task = created_task(world)?;
    let stored = world
        .client
        .tasks_in(&list_id(&list)?)
        .wrap_err("read list")?;
    if stored.iter().any(|candidate| candidate.id == task.id) {
        Ok(())
    } else {
        Err(eyre!("task {} is not stored in list {list}", task.id))
    }
}

#[then(r#"the created task is tagged "{tag}""#)]
fn created_task_tagged(world: &mut LeadSyncWorld, tag: String) -> Result<(), eyre::Report> {
    let task = created_task(world)?;
    let draft = world
        .client
        .draft_for(&task.id)
        .wrap_err("read draft")?
        .ok_or_else(|| eyre!("no draft stored for {}", task.id))?;
    if draft.tags.contains(&tag) {
        Ok(())
    } else {
        Err(eyre!("tags {:?} do not include {tag}", draft.tags))
    }
}

#[then(r#"the created task description contains "{text}""#)]
fn created_description_contains(
    world: &mut LeadSyncWorld,
    text: String,
) -> Result<(), eyre::Report> {
    let task = created_task(world)?;
    if task.description.contains(&text) {
        Ok(())
    } else {
        Err(eyre!("description does not contain {text:?}: {}", task.description))
    }
}

#[then(r#"the delete status is "{status}""#)]
fn delete_status_is(world: &mut LeadSyncWorld, status: String) -> Result<(), eyre::Report> {
    let outcome = delete_outcome(world)?;
    if outcome.status.as_str() == status {
        Ok(())
    } else {
        Err(eyre!(
            "expected status {status}, got {} ({})",
            outcome.status,
            outcome.diagnosis
        ))
    }
}

#[then(r#"list "{list}" was searched {count:usize} times"#)]
fn list_searched(world: &mut LeadSyncWorld, list: String, count: usize) -> Result<(), eyre::Report> {
    let calls = world
        .client
        .list_calls(&list_id(&list)?)
        .wrap_err("count list calls")?;
    if calls == count {
        Ok(())
    } else {
        Err(eyre!("list {list} was searched {calls} times, expected {count}"))
    }
}

#[then("no remote task was deleted")]
fn nothing_deleted(world: &mut LeadSyncWorld) -> Result<(), eyre::Report> {
    let deletes = world.client.delete_calls().wrap_err("count deletes")?;
    if deletes == 0 {
        Ok(())
    } else {
        Err(eyre!("{deletes} delete calls were made"))
    }
}

#[then("the outcome records the task as found in another list")]
fn found_in_other_list(world: &mut LeadSyncWorld) -> Result<(), eyre::Report> {
    let outcome = delete_outcome(world)?;
    if outcome.found_in_other_list() {
        Ok(())
    } else {
        Err(eyre!("outcome did not record a cross-list match: {outcome:?}"))
    }
}

#[then(r#"list "{list}" no longer holds task "{task}""#)]
fn list_no_longer_holds(
    world: &mut LeadSyncWorld,
    list: String,
    task: String,
) -> Result<(), eyre::Report> {
    let stored = world
        .client
        .tasks_in(&list_id(&list)?)
        .wrap_err("read list")?;
    if stored.iter().any(|candidate| candidate.id.as_str() == task) {
        Err(eyre!("task {task} is still stored in list {list}"))
    } else {
        Ok(())
    }
}

#[then(r#"the deleted task is "{task}""#)]
fn deleted_task_is(world: &mut LeadSyncWorld, task: String) -> Result<(), eyre::Report> {
    let outcome = delete_outcome(world)?;
    match outcome.task_id.as_ref() {
        Some(chosen) if chosen.as_str() == task => Ok(()),
        other => Err(eyre!("expected task {task}, got {other:?}")),
    }
}

#[then("the outcome lists {count:usize} candidate tasks")]
fn candidate_count(world: &mut LeadSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let outcome = delete_outcome(world)?;
    if outcome.candidate_task_ids.len() == count && outcome.was_ambiguous() == (count > 1) {
        Ok(())
    } else {
        Err(eyre!(
            "expected {count} candidates, got {:?}",
            outcome.candidate_task_ids
        ))
    }
}

#[then("no remote call was made")]
fn no_remote_call(world: &mut LeadSyncWorld) -> Result<(), eyre::Report> {
    let calls = world.client.calls().wrap_err("read calls")?;
    if calls.is_empty() {
        Ok(())
    } else {
        Err(eyre!("unexpected remote calls: {calls:?}"))
    }
}

#[then("no task was created")]
fn no_task_created(world: &mut LeadSyncWorld) -> Result<(), eyre::Report> {
    match world.last_report.as_ref() {
        Some(RelayReport::Created(None)) => Ok(()),
        other => Err(eyre!("expected no created task, got {other:?}")),
    }
}
