//! Plain-text and JSON renderings of a governance snapshot.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use serde::Serialize;

use referenda_governance::{tally, ClaimChunk, DecisionTotals, DecoupledVote};
use referenda_service::{describe_unlock, BlockTimeOracle, GovernanceSnapshot};
use referenda_types::{Address, Balance, ReferendumId};

#[derive(Serialize)]
struct ScheduleView<'a> {
    current_block: u64,
    claims: BTreeMap<&'a Address, &'a [ClaimChunk]>,
    total_claimable: Balance,
}

#[derive(Serialize)]
struct VotesView {
    referendum: ReferendumId,
    votes: Vec<DecoupledVote>,
    totals: DecisionTotals,
}

/// Claim chunks of `address`, or of every locked address.
pub fn schedule(
    snapshot: &GovernanceSnapshot,
    address: Option<&Address>,
    oracle: &dyn BlockTimeOracle,
    json: bool,
) -> Result<String> {
    let claims: BTreeMap<&Address, &[ClaimChunk]> = match address {
        Some(address) => [(address, snapshot.claims_for(address))].into_iter().collect(),
        None => snapshot
            .claims
            .iter()
            .map(|(address, chunks)| (address, chunks.as_slice()))
            .collect(),
    };
    let total_claimable = match address {
        Some(address) => snapshot.claimable_for(address),
        None => snapshot.total_claimable,
    };

    if json {
        return Ok(serde_json::to_string_pretty(&ScheduleView {
            current_block: snapshot.current_block().get(),
            claims,
            total_claimable,
        })?);
    }

    let mut lines = vec![format!("block {}", snapshot.current_block())];
    for (address, chunks) in &claims {
        lines.push(address.to_string());
        if chunks.is_empty() {
            lines.push("  nothing locked".to_string());
        }
        for chunk in chunks.iter() {
            lines.push(format!(
                "  track {:>3}  {:>24}  {}",
                chunk.track.get(),
                chunk.amount.raw(),
                describe_unlock(chunk, snapshot.current_block(), oracle)
            ));
        }
    }
    lines.push(format!("claimable now: {total_claimable}"));
    Ok(lines.join("\n"))
}

pub fn locks(snapshot: &GovernanceSnapshot, json: bool) -> Result<String> {
    let summary = &snapshot.track_locks;
    if json {
        return Ok(serde_json::to_string_pretty(summary)?);
    }

    let mut lines = Vec::new();
    for (address, tracks) in &summary.locks {
        let per_track: Vec<String> = tracks
            .iter()
            .map(|(track, amount)| format!("{}={amount}", track.get()))
            .collect();
        lines.push(format!(
            "{address}  max {}  [{}]",
            summary.max_for(address),
            per_track.join(", ")
        ));
    }
    lines.push(format!("wallet locked: {}", summary.total));
    Ok(lines.join("\n"))
}

pub fn delegations(snapshot: &GovernanceSnapshot, json: bool) -> Result<String> {
    let summary = &snapshot.delegations;
    if json {
        return Ok(serde_json::to_string_pretty(summary)?);
    }

    let mut lines = Vec::new();
    for (target, delegators) in &summary.balances {
        lines.push(format!("{target}  receives {}", summary.delegated_to(target)));
        for (delegator, delegated) in delegators {
            let tracks: Vec<String> = summary
                .tracks_of(target, delegator)
                .iter()
                .map(|track| track.get().to_string())
                .collect();
            lines.push(format!(
                "  {}  {} ({})  tracks [{}]",
                delegator.short(),
                delegated.balance,
                delegated.conviction,
                tracks.join(", ")
            ));
        }
    }
    lines.push(format!("total delegated: {}", summary.total_delegated));
    Ok(lines.join("\n"))
}

pub fn votes(snapshot: &GovernanceSnapshot, referendum: ReferendumId, json: bool) -> Result<String> {
    let votes = snapshot
        .inputs
        .referendum_votes(referendum)
        .ok_or_else(|| anyhow!("{referendum} is not in the snapshot"))?;
    let totals = tally(&votes);

    if json {
        return Ok(serde_json::to_string_pretty(&VotesView {
            referendum,
            votes,
            totals,
        })?);
    }

    let mut lines: Vec<String> = votes
        .iter()
        .map(|vote| {
            format!(
                "{}  {:?}  {} × {} = {}",
                vote.voter.short(),
                vote.decision,
                vote.balance,
                vote.conviction_multiplier,
                vote.voting_power
            )
        })
        .collect();
    lines.push(format!(
        "aye {}  nay {}  abstain {}",
        totals.aye, totals.nay, totals.abstain
    ));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use referenda_service::{aggregate, AverageBlockTime, ChainSnapshot, InputSnapshot};
    use referenda_types::ChainConstants;
    use std::sync::Arc;

    const SNAPSHOT: &str = r#"{
        "chain": "polkadot",
        "constants": { "vote_locking_period": 100, "undeciding_timeout": 100 },
        "current_block": 150,
        "referenda": [
            { "id": 3, "track": 0, "status": { "state": "approved", "since": 100 } }
        ],
        "tracks": [ { "id": 0, "name": "root", "decision_period": 100 } ],
        "locks": { "alice": { "0": 500 }, "bob": { "0": 20 } },
        "records": [
            {
                "address": "alice",
                "votes": {
                    "3": { "type": "standard", "aye": true, "conviction": "Locked1x", "balance": 500 }
                }
            },
            {
                "address": "bob",
                "delegations": [
                    { "target": "alice", "conviction": "Locked2x", "balance": 20, "tracks": [0] }
                ]
            }
        ]
    }"#;

    fn governance() -> GovernanceSnapshot {
        governance_from(SNAPSHOT)
    }

    fn governance_from(json: &str) -> GovernanceSnapshot {
        let chain = ChainSnapshot::from_json_str(json).unwrap();
        let inputs = InputSnapshot {
            constants: chain.constants.unwrap_or_else(ChainConstants::polkadot),
            current_block: chain.current_block,
            referenda: Arc::new(chain.referenda.into_iter().map(|r| (r.id, r)).collect()),
            tracks: Arc::new(chain.tracks.into_iter().map(|t| (t.id, t)).collect()),
            locks: Arc::new(chain.locks),
            records: Arc::new(
                chain
                    .records
                    .into_iter()
                    .map(|r| (r.address.clone(), r))
                    .collect(),
            ),
        };
        aggregate("polkadot", 1, inputs)
    }

    #[test]
    fn schedule_lists_every_locked_address() {
        let text = schedule(&governance(), None, &AverageBlockTime::default(), false).unwrap();
        assert_eq!(
            text,
            [
                "block #150".to_string(),
                "alice".to_string(),
                format!("  track   0  {:>24}  in 5m 0s (block #200)", 500),
                "bob".to_string(),
                format!("  track   0  {:>24}  after undelegating", 20),
                "claimable now: 0".to_string(),
            ]
            .join("\n")
        );
    }

    #[test]
    fn schedule_for_unlocked_address() {
        let carol = Address::new("carol");
        let text = schedule(&governance(), Some(&carol), &AverageBlockTime::default(), false).unwrap();
        assert!(text.contains("nothing locked"));
    }

    #[test]
    fn schedule_json_is_machine_readable() {
        let text = schedule(&governance(), None, &AverageBlockTime::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["current_block"], 150);
        assert_eq!(value["claims"]["alice"][0]["status"]["kind"], "pending_lock");
        assert_eq!(value["claims"]["bob"][0]["status"]["kind"], "pending_delegation");
    }

    #[test]
    fn locks_and_delegations() {
        let snapshot = governance();
        let text = locks(&snapshot, false).unwrap();
        assert!(text.ends_with("wallet locked: 520"));

        let text = delegations(&snapshot, false).unwrap();
        assert!(text.starts_with("alice  receives 20"));
        assert!(text.contains("  bob  20 (locked 2x)  tracks [0]"));
        assert!(text.ends_with("total delegated: 20"));
    }

    #[test]
    fn votes_include_delegated_abstain() {
        let snapshot = governance();
        let text = votes(&snapshot, ReferendumId::new(3), false).unwrap();
        assert!(text.ends_with("aye 500  nay 0  abstain 40"));
        assert!(votes(&snapshot, ReferendumId::new(9), false).is_err());
    }

    #[test]
    fn long_addresses_are_shortened_in_tables() {
        let long = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
        let snapshot = governance_from(&SNAPSHOT.replace("\"bob\"", &format!("\"{long}\"")));

        let text = delegations(&snapshot, false).unwrap();
        assert!(text.contains("  5Grw\u{2026}utQY  20 (locked 2x)  tracks [0]"));

        let text = votes(&snapshot, ReferendumId::new(3), false).unwrap();
        assert!(text.contains("5Grw\u{2026}utQY  Abstain  20 × "));
        assert!(!text.contains(long));
    }
}
