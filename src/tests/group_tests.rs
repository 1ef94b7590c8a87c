use crate::constants::{GROUP_CREATED, GROUP_TRANSACTION_ADDED, RECURRING_PAYMENT_CREATED};
use crate::core::calendar::Interval;
use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, Role},
    transaction::{NewGroupTransaction, TransactionKind},
};
use crate::core::money::MonetaryAmount;
use crate::infrastructure::logging::{LoggingService, in_memory::InMemoryLogging};
use crate::tests::{TestService, at, cents, create_test_service, new_rent};
use serde_json::json;

async fn create_flat(service: &TestService) -> Group {
    service
        .create_group(
            "Flat".to_string(),
            "alice",
            vec!["bob".to_string(), "carol".to_string()],
        )
        .await
        .unwrap()
}

fn request(kind: TransactionKind, amount: i64, user_id: &str, participants: &[&str]) -> NewGroupTransaction {
    NewGroupTransaction {
        name: "Groceries".to_string(),
        amount: cents(amount),
        kind,
        user_id: user_id.to_string(),
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_create_group_makes_creator_owner() {
    let service = create_test_service();

    let group = service
        .create_group(
            "Flat".to_string(),
            "alice",
            vec!["bob".to_string(), "alice".to_string(), "bob".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(group.value, MonetaryAmount::zero());
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.members[0].user_id, "alice");
    assert_eq!(group.members[0].role, Role::Owner);
    assert_eq!(group.members[1].role, Role::Member);
    assert_eq!(group.owner_ids().collect::<Vec<_>>(), vec!["alice"]);
    assert_eq!(service.get_group(&group.id).await.unwrap(), Some(group));
}

#[tokio::test]
async fn test_create_group_rejects_blank_name() {
    let service = create_test_service();

    let result = service.create_group("   ".to_string(), "alice", vec![]).await;

    assert!(matches!(result, Err(LedgerError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_transactions_move_the_pool_and_balances() {
    let service = create_test_service();
    let group = create_flat(&service).await;

    let top_up = service
        .add_group_transaction(&group.id, request(TransactionKind::TopUp, 2_000, "alice", &[]))
        .await
        .unwrap();
    let buy = service
        .add_group_transaction(
            &group.id,
            request(TransactionKind::Buy, 1_000, "bob", &["alice", "bob", "carol"]),
        )
        .await
        .unwrap();

    assert_eq!(top_up.amount, cents(2_000));
    assert_eq!(buy.amount, cents(-1_000));

    let stored = service.get_group(&group.id).await.unwrap().unwrap();
    assert_eq!(stored.value, cents(1_000));

    let balances = service.get_group_balances(&group.id).await.unwrap();
    assert_eq!(balances.balances["alice"], cents(1_666));
    assert_eq!(balances.balances["bob"], cents(-333));
    assert_eq!(balances.balances["carol"], cents(-333));
    assert_eq!(balances.ledger_total, balances.group_value);
    assert_eq!(balances.group_value, cents(1_000));

    let listed = service.list_group_transactions(&group.id).await.unwrap();
    assert_eq!(listed, vec![top_up, buy]);
}

#[tokio::test]
async fn test_rejected_transaction_leaves_group_untouched() {
    let service = create_test_service();
    let group = create_flat(&service).await;

    let result = service
        .add_group_transaction(&group.id, request(TransactionKind::Buy, 500, "alice", &[]))
        .await;

    assert!(matches!(result, Err(LedgerError::InconsistentParticipants(_))));
    assert!(service.list_group_transactions(&group.id).await.unwrap().is_empty());
    assert_eq!(
        service.get_group(&group.id).await.unwrap().unwrap().value,
        MonetaryAmount::zero()
    );
}

#[tokio::test]
async fn test_top_up_with_participants_is_rejected() {
    let service = create_test_service();
    let group = create_flat(&service).await;

    let result = service
        .add_group_transaction(&group.id, request(TransactionKind::TopUp, 500, "alice", &["bob"]))
        .await;

    assert!(matches!(result, Err(LedgerError::InconsistentParticipants(_))));
}

#[tokio::test]
async fn test_outsiders_cannot_act_or_participate() {
    let service = create_test_service();
    let group = create_flat(&service).await;

    let as_actor = service
        .add_group_transaction(&group.id, request(TransactionKind::TopUp, 500, "mallory", &[]))
        .await;
    let as_participant = service
        .add_group_transaction(
            &group.id,
            request(TransactionKind::TakeOut, 500, "alice", &["alice", "mallory"]),
        )
        .await;

    assert!(matches!(as_actor, Err(LedgerError::NotGroupMember(ref id)) if id == "mallory"));
    assert!(matches!(as_participant, Err(LedgerError::NotGroupMember(ref id)) if id == "mallory"));
}

#[tokio::test]
async fn test_amount_must_be_positive() {
    let service = create_test_service();
    let group = create_flat(&service).await;

    for amount in [0, -500] {
        let result = service
            .add_group_transaction(&group.id, request(TransactionKind::TopUp, amount, "alice", &[]))
            .await;
        assert!(matches!(result, Err(LedgerError::InvalidInput(ref field, _)) if field == "amount"));
    }
}

#[tokio::test]
async fn test_unknown_group() {
    let service = create_test_service();

    let added = service
        .add_group_transaction("missing", request(TransactionKind::TopUp, 500, "alice", &[]))
        .await;

    assert!(matches!(added, Err(LedgerError::GroupNotFound(_))));
    assert!(matches!(
        service.get_group_balances("missing").await,
        Err(LedgerError::GroupNotFound(_))
    ));
    assert!(matches!(
        service.list_group_transactions("missing").await,
        Err(LedgerError::GroupNotFound(_))
    ));
    assert_eq!(service.get_group("missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_group_actions_are_logged() {
    let service = create_test_service();
    let group = create_flat(&service).await;
    service
        .add_group_transaction(&group.id, request(TransactionKind::TopUp, 500, "bob", &[]))
        .await
        .unwrap();

    let logs = service.get_app_logs(None).await.unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].action, GROUP_CREATED);
    assert_eq!(logs[0].user_id.as_deref(), Some("alice"));
    assert_eq!(logs[1].action, GROUP_TRANSACTION_ADDED);
    assert_eq!(logs[1].user_id.as_deref(), Some("bob"));
    assert_eq!(logs[1].details["group_id"], group.id);

    let transactions_only = service.get_app_logs(Some(GROUP_TRANSACTION_ADDED)).await.unwrap();
    assert_eq!(transactions_only.len(), 1);
    assert_eq!(transactions_only[0].id, logs[1].id);
}

#[tokio::test]
async fn test_create_recurring_payment_schedules_first_booking() {
    let service = create_test_service();

    let definition = service
        .create_recurring_payment(new_rent(Interval::Monthly, at(2024, 1, 31)))
        .await
        .unwrap();

    assert_eq!(definition.last_booking, None);
    assert_eq!(definition.next_booking, Some(at(2024, 2, 29)));
    assert_eq!(
        service.get_recurring_payment(&definition.id).await.unwrap(),
        Some(definition.clone())
    );
    assert!(service.list_booked_payments(&definition.id).await.unwrap().is_empty());

    let logs = service.get_app_logs(None).await.unwrap();
    assert_eq!(logs[0].action, RECURRING_PAYMENT_CREATED);
}

#[tokio::test]
async fn test_create_recurring_payment_validation() {
    let service = create_test_service();

    let mut zero = new_rent(Interval::Weekly, at(2024, 1, 1));
    zero.value = MonetaryAmount::zero();
    let mut inverted = new_rent(Interval::Weekly, at(2024, 2, 1));
    inverted.end_date = Some(at(2024, 1, 1));
    let mut unnamed = new_rent(Interval::Weekly, at(2024, 1, 1));
    unnamed.name = String::new();

    for (request, field) in [(zero, "value"), (inverted, "end_date"), (unnamed, "name")] {
        let result = service.create_recurring_payment(request).await;
        assert!(matches!(result, Err(LedgerError::InvalidInput(ref f, _)) if f == field));
    }
    assert!(matches!(
        service.list_booked_payments("missing").await,
        Err(LedgerError::RecurringPaymentNotFound(_))
    ));
}

#[tokio::test]
async fn test_log_details_must_be_an_object() {
    let logging = InMemoryLogging::new();

    let rejected = logging.log_action(GROUP_CREATED, json!(["not", "an", "object"]), None).await;

    assert!(matches!(rejected, Err(LedgerError::LoggingError(_))));
    assert!(logging.get_logs(None).await.unwrap().is_empty());
}
