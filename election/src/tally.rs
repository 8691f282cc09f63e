//! Tally engine: aggregate counts and the plurality winner.
//!
//! All queries require a closed round. They scan candidate ids from 1 up to
//! the round's tracked maximum, skipping ids that were never populated or
//! were removed. The winner is the first candidate in ascending id order to
//! reach the highest count: the running leader is only replaced on a
//! strictly greater count.

use ballot_types::{CandidateId, PartyNumber, Phase};
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::round::ElectionRound;
use crate::ElectionError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyResult {
    pub party_number: PartyNumber,
    pub party_name: String,
    pub votes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerResult {
    pub candidate_id: CandidateId,
    pub name: String,
    pub votes: u64,
}

pub struct TallyEngine;

impl TallyEngine {
    /// `(party number, votes)` per populated candidate, ascending id order.
    pub fn all_party_votes(
        &self,
        round: &ElectionRound,
    ) -> Result<Vec<(PartyNumber, u64)>, ElectionError> {
        let populated = self.scan(round)?;
        Ok(populated
            .into_iter()
            .map(|c| (c.party_number, c.votes))
            .collect())
    }

    pub fn winning_party(&self, round: &ElectionRound) -> Result<PartyResult, ElectionError> {
        let leader = self.leader(round)?;
        Ok(PartyResult {
            party_number: leader.party_number,
            party_name: leader.party_name.clone(),
            votes: leader.votes,
        })
    }

    pub fn winner(&self, round: &ElectionRound) -> Result<WinnerResult, ElectionError> {
        let leader = self.leader(round)?;
        Ok(WinnerResult {
            candidate_id: leader.id,
            name: leader.name.clone(),
            votes: leader.votes,
        })
    }

    /// Sum of all candidate counts. Equals the round's cast-vote count.
    pub fn total_votes(&self, round: &ElectionRound) -> Result<u64, ElectionError> {
        Ok(self.scan(round)?.iter().map(|c| c.votes).sum())
    }

    fn leader<'a>(&self, round: &'a ElectionRound) -> Result<&'a Candidate, ElectionError> {
        let mut leader: Option<&Candidate> = None;
        for candidate in self.scan(round)? {
            match leader {
                Some(best) if candidate.votes <= best.votes => {}
                _ => leader = Some(candidate),
            }
        }
        leader.ok_or(ElectionError::NoCandidates)
    }

    fn scan<'a>(&self, round: &'a ElectionRound) -> Result<Vec<&'a Candidate>, ElectionError> {
        let phase = round.phase();
        if phase != Phase::Closed {
            return Err(ElectionError::ElectionNotClosed(phase));
        }
        let registry = round.candidates();
        let populated: Vec<&Candidate> = (1..=registry.max_id())
            .filter_map(|id| registry.get(id))
            .collect();
        if populated.is_empty() {
            return Err(ElectionError::NoCandidates);
        }
        Ok(populated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateInput;
    use crate::config::ElectionConfig;
    use ballot_types::{RoundId, Timestamp};

    fn closed_round_with(votes: &[(CandidateId, u64)]) -> ElectionRound {
        let config = ElectionConfig::default();
        let mut round = ElectionRound::new(RoundId::FIRST, "t".into(), 1, Timestamp::EPOCH);
        for &(id, count) in votes {
            round
                .add_candidate(
                    CandidateInput::new(id, id, format!("P{id}"), format!("C{id}")),
                    &config,
                    Timestamp::EPOCH,
                )
                .unwrap();
            for _ in 0..count {
                round.candidates.record_vote(id);
            }
        }
        for target in [Phase::Registration, Phase::Voting, Phase::Closed] {
            round.advance(target, Timestamp::EPOCH).unwrap();
        }
        round
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let round = closed_round_with(&[(1, 5), (2, 7), (3, 7)]);
        let winner = TallyEngine.winner(&round).unwrap();
        assert_eq!(winner.candidate_id, 2);
        assert_eq!(winner.votes, 7);
        assert_eq!(TallyEngine.winning_party(&round).unwrap().party_number, 2);
    }

    #[test]
    fn all_zero_picks_first_candidate() {
        let round = closed_round_with(&[(3, 0), (4, 0)]);
        assert_eq!(TallyEngine.winner(&round).unwrap().candidate_id, 3);
    }

    #[test]
    fn party_votes_skip_gaps() {
        let round = closed_round_with(&[(2, 1), (5, 4)]);
        assert_eq!(TallyEngine.all_party_votes(&round).unwrap(), vec![(2, 1), (5, 4)]);
        assert_eq!(TallyEngine.total_votes(&round).unwrap(), 5);
    }

    #[test]
    fn empty_round_has_no_candidates() {
        let round = closed_round_with(&[]);
        assert_eq!(TallyEngine.winner(&round), Err(ElectionError::NoCandidates));
        assert_eq!(TallyEngine.all_party_votes(&round), Err(ElectionError::NoCandidates));
    }

    #[test]
    fn open_round_is_refused() {
        let round = ElectionRound::new(RoundId::FIRST, "t".into(), 1, Timestamp::EPOCH);
        assert_eq!(
            TallyEngine.winner(&round),
            Err(ElectionError::ElectionNotClosed(Phase::Setup))
        );
    }
}
