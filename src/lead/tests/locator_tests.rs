//! Unit tests for the tiered task search and delete outcomes.

use std::sync::Arc;

use super::support::{
    CONSTRUCTION_LIST, LEAD_NUMBER, NUMBER_FIELD, RETAIL_LIST, RETAIL_NUMBER_FIELD, SOLAR_LIST,
    SOLAR_NUMBER_FIELD, SequencedRoutingSource, category, construction_lead, field, lead, list,
    lead_number, locator, routing_table, task_carrying, task_id,
};
use crate::lead::{
    adapters::memory::{InMemoryRemoteTaskClient, RemoteCall, SharedRoutingTable},
    domain::{LogicalField, RoutingEntry, RoutingTable, SyncStatus},
    ports::RemoteTaskClientError,
};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn client() -> Arc<InMemoryRemoteTaskClient> {
    Arc::new(InMemoryRemoteTaskClient::new())
}

fn shared_routing() -> Arc<SharedRoutingTable> {
    Arc::new(SharedRoutingTable::new(routing_table()))
}

fn seed(client: &InMemoryRemoteTaskClient, list_id: &str, id: &str, field_id: &str, value: &str) {
    client
        .seed_task(list(list_id), task_carrying(id, field_id, json!(value)))
        .expect("seed task");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletes_the_task_found_in_the_declared_list(client: Arc<InMemoryRemoteTaskClient>) {
    seed(&client, CONSTRUCTION_LIST, "task-a", NUMBER_FIELD, " 042-0825 ");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::Deleted);
    assert_eq!(outcome.trail, vec![SyncStatus::Deleted]);
    assert_eq!(outcome.task_id, Some(task_id("task-a")));
    assert_eq!(outcome.list_id, Some(list(CONSTRUCTION_LIST)));
    assert_eq!(outcome.lead_number_field_id, Some(field(NUMBER_FIELD)));
    assert!(!outcome.found_in_other_list());
    assert_eq!(client.list_calls(&list(CONSTRUCTION_LIST)).expect("calls"), 1);
    assert!(client.tasks_in(&list(CONSTRUCTION_LIST)).expect("tasks").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uncategorised_leads_search_the_construction_list(client: Arc<InMemoryRemoteTaskClient>) {
    seed(&client, CONSTRUCTION_LIST, "task-a", NUMBER_FIELD, LEAD_NUMBER);
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&lead(LEAD_NUMBER)).await;

    assert_eq!(outcome.status, SyncStatus::Deleted);
    assert_eq!(outcome.category, category("construction"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn numeric_field_values_match_numeric_lead_numbers(client: Arc<InMemoryRemoteTaskClient>) {
    client
        .seed_task(
            list(CONSTRUCTION_LIST),
            task_carrying("task-n", NUMBER_FIELD, json!(4_200_825)),
        )
        .expect("seed task");
    let locator = locator(shared_routing(), &client);

    let found = locator
        .find_task_id(&category("construction"), &lead_number("4200825"))
        .await
        .expect("search succeeds");

    assert_eq!(found, Some(task_id("task-n")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fractional_field_values_truncate_to_the_lead_number(
    client: Arc<InMemoryRemoteTaskClient>,
) {
    client
        .seed_task(
            list(CONSTRUCTION_LIST),
            task_carrying("task-f", NUMBER_FIELD, json!(4_200_825.7)),
        )
        .expect("seed task");
    let locator = locator(shared_routing(), &client);

    let found = locator
        .find_task_id(&category("construction"), &lead_number("4200825"))
        .await
        .expect("search succeeds");

    assert_eq!(found, Some(task_id("task-f")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_retries_once_then_searches_other_lists_without_deleting(
    client: Arc<InMemoryRemoteTaskClient>,
) {
    seed(&client, CONSTRUCTION_LIST, "task-x", NUMBER_FIELD, "999-0000");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::NotFound);
    assert_eq!(outcome.task_id, None);
    assert_eq!(client.list_calls(&list(CONSTRUCTION_LIST)).expect("calls"), 2);
    assert_eq!(client.list_calls(&list(RETAIL_LIST)).expect("calls"), 1);
    assert_eq!(client.list_calls(&list(SOLAR_LIST)).expect("calls"), 1);
    assert_eq!(client.delete_calls().expect("calls"), 0);
    assert!(outcome.diagnosis.contains("retried"));
    assert!(outcome.diagnosis.contains(LEAD_NUMBER));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_category_is_resolved_through_another_list(client: Arc<InMemoryRemoteTaskClient>) {
    seed(&client, RETAIL_LIST, "task-r", RETAIL_NUMBER_FIELD, LEAD_NUMBER);
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::Deleted);
    assert_eq!(
        outcome.trail,
        vec![SyncStatus::FoundOtherList, SyncStatus::Deleted]
    );
    assert!(outcome.found_in_other_list());
    assert_eq!(outcome.matched_category, Some(category("retail")));
    assert_eq!(outcome.matched_list_id, Some(list(RETAIL_LIST)));
    assert_eq!(
        client.calls().expect("calls"),
        vec![
            RemoteCall::List(list(CONSTRUCTION_LIST)),
            RemoteCall::List(list(CONSTRUCTION_LIST)),
            RemoteCall::List(list(RETAIL_LIST)),
            RemoteCall::Delete(task_id("task-r")),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn several_matches_choose_the_last_listed_and_name_all(
    client: Arc<InMemoryRemoteTaskClient>,
) {
    seed(&client, CONSTRUCTION_LIST, "task-a", NUMBER_FIELD, LEAD_NUMBER);
    seed(&client, CONSTRUCTION_LIST, "task-b", NUMBER_FIELD, "042-0825 ");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::Deleted);
    assert_eq!(outcome.task_id, Some(task_id("task-b")));
    assert_eq!(
        outcome.candidate_task_ids,
        vec![task_id("task-a"), task_id("task-b")]
    );
    assert!(outcome.was_ambiguous());
    assert!(outcome.diagnosis.contains("task-a"));
    assert!(outcome.diagnosis.contains("task-b"));
    assert_eq!(
        client.tasks_in(&list(CONSTRUCTION_LIST)).expect("tasks").len(),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_uses_freshly_resolved_lead_number_field(client: Arc<InMemoryRemoteTaskClient>) {
    let construction = category("construction");
    let stale = RoutingTable::new().with_entry(
        construction.clone(),
        RoutingEntry::new(CONSTRUCTION_LIST).with_field(LogicalField::LeadNumber, "fld-old"),
    );
    let fresh = RoutingTable::new().with_entry(
        construction,
        RoutingEntry::new(CONSTRUCTION_LIST).with_field(LogicalField::LeadNumber, "fld-new"),
    );
    let source = Arc::new(SequencedRoutingSource::new(vec![stale, fresh]));
    seed(&client, CONSTRUCTION_LIST, "task-a", "fld-new", LEAD_NUMBER);
    let locator = locator(Arc::clone(&source), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::Deleted);
    assert_eq!(outcome.lead_number_field_id, Some(field("fld-new")));
    assert!(outcome.diagnosis.contains("fld-old"));
    assert!(outcome.diagnosis.contains("fld-new"));
    assert_eq!(source.loads(), 2);
    assert_eq!(client.list_calls(&list(CONSTRUCTION_LIST)).expect("calls"), 2);
}

#[rstest]
#[case(RoutingTable::new(), "construction")]
#[case(routing_table(), "roofing")]
#[tokio::test(flavor = "multi_thread")]
async fn configuration_faults_make_no_remote_calls(
    client: Arc<InMemoryRemoteTaskClient>,
    #[case] table: RoutingTable,
    #[case] declared: &str,
) {
    let locator = locator(Arc::new(SharedRoutingTable::new(table)), &client);
    let target = lead(LEAD_NUMBER).with_category(category(declared));

    let outcome = locator.locate_for_delete(&target).await;

    assert_eq!(outcome.status, SyncStatus::ConfigError);
    assert!(!outcome.diagnosis.is_empty());
    assert!(client.calls().expect("calls").is_empty());
}

#[rstest]
#[case(RemoteTaskClientError::Unauthorized("bad token".to_owned()), SyncStatus::AuthError)]
#[case(RemoteTaskClientError::NotFound("gone".to_owned()), SyncStatus::NotFoundAfterDelete)]
#[case(RemoteTaskClientError::Conflict("locked".to_owned()), SyncStatus::Conflict)]
#[case(
    RemoteTaskClientError::Status { status: 500, message: "boom".to_owned() },
    SyncStatus::Error
)]
#[tokio::test(flavor = "multi_thread")]
async fn delete_failures_map_to_statuses(
    client: Arc<InMemoryRemoteTaskClient>,
    #[case] failure: RemoteTaskClientError,
    #[case] expected: SyncStatus,
) {
    seed(&client, CONSTRUCTION_LIST, "task-a", NUMBER_FIELD, LEAD_NUMBER);
    client.fail_next_delete(failure).expect("inject failure");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, expected);
    assert_eq!(outcome.task_id, Some(task_id("task-a")));
    assert!(outcome.diagnosis.contains("task-a"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfirmed_delete_is_reported_as_failed(client: Arc<InMemoryRemoteTaskClient>) {
    seed(&client, CONSTRUCTION_LIST, "task-a", NUMBER_FIELD, LEAD_NUMBER);
    client.leave_deletes_unconfirmed().expect("configure client");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::DeleteFailed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_failure_on_the_declared_list_stops_the_search(
    client: Arc<InMemoryRemoteTaskClient>,
) {
    client
        .fail_listing(
            list(CONSTRUCTION_LIST),
            RemoteTaskClientError::Unauthorized("bad token".to_owned()),
        )
        .expect("inject failure");
    let locator = locator(shared_routing(), &client);

    let outcome = locator.locate_for_delete(&construction_lead()).await;

    assert_eq!(outcome.status, SyncStatus::AuthError);
    assert_eq!(client.delete_calls().expect("calls"), 0);
    assert_eq!(client.list_calls(&list(RETAIL_LIST)).expect("calls"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_category_search_skips_unreadable_lists(client: Arc<InMemoryRemoteTaskClient>) {
    client
        .fail_listing(
            list(RETAIL_LIST),
            RemoteTaskClientError::Status {
                status: 502,
                message: "bad gateway".to_owned(),
            },
        )
        .expect("inject failure");
    seed(&client, SOLAR_LIST, "task-s", SOLAR_NUMBER_FIELD, LEAD_NUMBER);
    let locator = locator(shared_routing(), &client);

    let found = locator
        .find_in_other_lists(&category("construction"), &lead_number(LEAD_NUMBER))
        .await
        .expect("search succeeds")
        .expect("match in solar list");

    assert_eq!(found.category, category("solar"));
    assert_eq!(found.chosen(), Some(&task_id("task-s")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn categories_sharing_a_list_are_searched_once(client: Arc<InMemoryRemoteTaskClient>) {
    let table = routing_table().with_entry(
        category("renovation"),
        RoutingEntry::new(CONSTRUCTION_LIST).with_field(LogicalField::LeadNumber, NUMBER_FIELD),
    );
    let locator = locator(Arc::new(SharedRoutingTable::new(table)), &client);

    let found = locator
        .find_in_other_lists(&category("construction"), &lead_number(LEAD_NUMBER))
        .await
        .expect("search succeeds");

    assert!(found.is_none());
    assert_eq!(client.list_calls(&list(CONSTRUCTION_LIST)).expect("calls"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn category_without_lead_number_field_finds_nothing(client: Arc<InMemoryRemoteTaskClient>) {
    let table = RoutingTable::new().with_entry(category("construction"), RoutingEntry::new("901"));
    let locator = locator(Arc::new(SharedRoutingTable::new(table)), &client);

    let found = locator
        .find_task_id(&category("construction"), &lead_number(LEAD_NUMBER))
        .await
        .expect("search succeeds");

    assert_eq!(found, None);
    assert!(client.calls().expect("calls").is_empty());
}
