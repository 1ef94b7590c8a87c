use crate::core::errors::LedgerError;
use crate::core::models::{
    group::Group,
    transaction::{GroupTransaction, TransactionKind},
};
use crate::core::money::MonetaryAmount;
use std::collections::{BTreeMap, HashSet};

pub type MemberBalances = BTreeMap<String, MonetaryAmount>;

/// Rejects participant sets a transaction of `kind` cannot be applied with.
pub fn check_participants(kind: TransactionKind, participants: &[String]) -> Result<(), LedgerError> {
    if !kind.splits_cost() {
        if participants.is_empty() {
            return Ok(());
        }
        return Err(LedgerError::InconsistentParticipants(
            "top-ups take no participants".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(LedgerError::InconsistentParticipants(
            "cannot split a cost across zero participants".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    if let Some(duplicate) = participants.iter().find(|p| !seen.insert(p.as_str())) {
        return Err(LedgerError::InconsistentParticipants(format!(
            "participant {} listed more than once",
            duplicate
        )));
    }
    Ok(())
}

/// Replays a group's ledger into one balance per member.
///
/// Top-ups credit the acting user. Buys and take-outs split their amount
/// across the participants in listed order, the first participants taking
/// the leftover minor units. The acting user of a buy is not credited: the
/// pool already paid. Balances always sum to the replayed ledger total.
pub fn calculate_balances(
    group: &Group,
    transactions: &[GroupTransaction],
) -> Result<MemberBalances, LedgerError> {
    let mut balances: MemberBalances = group
        .members
        .iter()
        .map(|m| (m.user_id.clone(), MonetaryAmount::zero()))
        .collect();

    let mut ordered: Vec<&GroupTransaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| tx.created_at);

    for tx in ordered {
        if !tx.kind.splits_cost() {
            credit(&mut balances, &tx.user_id, tx.amount)?;
            continue;
        }

        check_participants(tx.kind, &tx.participants)?;
        let shares = tx.amount.split_evenly(tx.participants.len()).ok_or_else(|| {
            LedgerError::InconsistentParticipants(format!("transaction {} has no participants", tx.id))
        })?;
        for (participant, share) in tx.participants.iter().zip(shares) {
            credit(&mut balances, participant, share)?;
        }
    }

    let out_of_range = || LedgerError::InvalidAmount("group balance out of range".to_string());
    let expected = MonetaryAmount::checked_sum(transactions.iter().map(|tx| tx.amount)).ok_or_else(out_of_range)?;
    let actual = MonetaryAmount::checked_sum(balances.values().copied()).ok_or_else(out_of_range)?;
    if expected != actual {
        return Err(LedgerError::ConservationViolated {
            expected: expected.minor(),
            actual: actual.minor(),
        });
    }

    Ok(balances)
}

// Former members keep their entry so the ledger still balances.
fn credit(balances: &mut MemberBalances, user_id: &str, amount: MonetaryAmount) -> Result<(), LedgerError> {
    let balance = balances.entry(user_id.to_string()).or_default();
    *balance = balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("balance of {} out of range", user_id)))?;
    Ok(())
}
