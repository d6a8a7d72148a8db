use shared::{
    api::{
        error::ValidationError,
        payloads::{
            renumber_workouts, ChallengeTree, NewChallenge, NewChallengeTree, NewChallengeWorkout,
            NewSequence, NewSequenceTree, NewWorkout, SequenceTree,
        },
    },
    model::ValidateModel,
    types::Uuid,
};
use tracing::{debug, info, warn};

use crate::{ApiClient, ClientError, FormError, SubmitError, SubmitStep};

/// Multi-step builder for a challenge with its sequences and their workouts.
///
/// Workouts are kept numbered 1..n in the order they appear in their
/// sequence, whatever edits are made.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeForm {
    tree: NewChallengeTree,
}

/// How far a sequential submission got
#[derive(Debug, Default)]
struct Progress {
    step: SubmitStep,
    sequences_created: usize,
    workouts_created: usize,
}

impl From<NewChallengeTree> for ChallengeForm {
    fn from(mut tree: NewChallengeTree) -> Self {
        for sequence in tree.sequences.iter_mut() {
            renumber_workouts(&mut sequence.workouts);
        }
        Self { tree }
    }
}

impl ChallengeForm {
    pub fn new(challenge: NewChallenge) -> Self {
        Self { tree: NewChallengeTree { challenge, sequences: Vec::new() } }
    }

    pub fn challenge(&self) -> &NewChallenge {
        &self.tree.challenge
    }

    pub fn challenge_mut(&mut self) -> &mut NewChallenge {
        &mut self.tree.challenge
    }

    pub fn sequences(&self) -> &[NewSequenceTree] {
        &self.tree.sequences
    }

    pub fn as_tree(&self) -> &NewChallengeTree {
        &self.tree
    }

    fn sequence_mut(&mut self, sequence: usize) -> Result<&mut NewSequenceTree, FormError> {
        self.tree.sequences.get_mut(sequence).ok_or(FormError::NoSuchSequence(sequence))
    }

    /// Returns the index of the new sequence
    pub fn add_sequence(&mut self, sequence: NewSequence) -> usize {
        self.tree.sequences.push(NewSequenceTree { sequence, workouts: Vec::new() });
        self.tree.sequences.len() - 1
    }

    pub fn remove_sequence(&mut self, sequence: usize) -> Result<NewSequenceTree, FormError> {
        if sequence >= self.tree.sequences.len() {
            return Err(FormError::NoSuchSequence(sequence));
        }
        Ok(self.tree.sequences.remove(sequence))
    }

    /// Append a workout to a sequence. Returns its index
    pub fn add_workout(&mut self, sequence: usize, workout: NewWorkout) -> Result<usize, FormError> {
        let workouts = &mut self.sequence_mut(sequence)?.workouts;
        workouts.push(workout);
        renumber_workouts(workouts);
        Ok(workouts.len() - 1)
    }

    pub fn remove_workout(
        &mut self,
        sequence: usize,
        workout: usize,
    ) -> Result<NewWorkout, FormError> {
        let workouts = &mut self.sequence_mut(sequence)?.workouts;
        if workout >= workouts.len() {
            return Err(FormError::NoSuchWorkout { sequence, workout });
        }
        let removed = workouts.remove(workout);
        renumber_workouts(workouts);
        Ok(removed)
    }

    /// Move a workout to a new position within its sequence
    pub fn move_workout(&mut self, sequence: usize, from: usize, to: usize) -> Result<(), FormError> {
        let workouts = &mut self.sequence_mut(sequence)?.workouts;
        for workout in [from, to] {
            if workout >= workouts.len() {
                return Err(FormError::NoSuchWorkout { sequence, workout });
            }
        }
        let moved = workouts.remove(from);
        workouts.insert(to, moved);
        renumber_workouts(workouts);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.tree.validate()
    }

    /// Create the challenge, then each sequence followed by its workouts, one
    /// request at a time. If a step fails the challenge is deleted again so
    /// nothing is left half built
    pub async fn submit_sequential(&self, client: &ApiClient) -> Result<ChallengeTree, ClientError> {
        self.validate()?;

        let challenge = client.create_challenge(&self.tree.challenge).await.map_err(|e| {
            SubmitError {
                step: SubmitStep::Challenge,
                challenge_id: None,
                sequences_created: 0,
                workouts_created: 0,
                compensated: false,
                source: Box::new(e),
            }
        })?;
        debug!(challenge_id = %challenge.challenge_id, "submit_sequential::challenge created");

        let mut progress = Progress::default();
        match self.submit_sequences(client, &challenge.challenge_id, &mut progress).await {
            Ok(sequences) => Ok(ChallengeTree { challenge, sequences }),
            Err(e) => {
                warn!(step = %progress.step, "Sequential submission failed: {e}");
                let compensated = compensate(client, &challenge.challenge_id).await;
                Err(SubmitError {
                    step: progress.step,
                    challenge_id: Some(challenge.challenge_id),
                    sequences_created: progress.sequences_created,
                    workouts_created: progress.workouts_created,
                    compensated,
                    source: Box::new(e),
                }
                .into())
            },
        }
    }

    async fn submit_sequences(
        &self,
        client: &ApiClient,
        challenge_id: &Uuid,
        progress: &mut Progress,
    ) -> Result<Vec<SequenceTree>, ClientError> {
        let mut created = Vec::with_capacity(self.tree.sequences.len());

        for (i, tree) in self.tree.sequences.iter().enumerate() {
            progress.step = SubmitStep::Sequence { sequence: i };
            let sequence = client
                .create_sequences(challenge_id, std::slice::from_ref(&tree.sequence))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ClientError::UnexpectedResponse("No sequence returned".to_owned()))?;
            progress.sequences_created += 1;

            let mut workouts = Vec::with_capacity(tree.workouts.len());
            for (j, workout) in tree.workouts.iter().enumerate() {
                progress.step = SubmitStep::Workout { sequence: i, workout: j };
                let body = NewChallengeWorkout {
                    sequence_id: sequence.sequence_id,
                    workout: workout.clone(),
                };
                workouts.push(client.create_challenge_workout(challenge_id, &body).await?);
                progress.workouts_created += 1;
            }

            created.push(SequenceTree { sequence, workouts });
        }

        Ok(created)
    }

    /// Send the whole form as one request. The server creates every row or
    /// none of them
    pub async fn submit_atomic(&self, client: &ApiClient) -> Result<ChallengeTree, ClientError> {
        self.validate()?;
        client.create_challenge_tree(&self.tree).await
    }
}

async fn compensate(client: &ApiClient, challenge_id: &Uuid) -> bool {
    match client.delete_challenge(challenge_id).await {
        Ok(_) => {
            info!(%challenge_id, "Deleted partially submitted challenge");
            true
        },
        Err(e) => {
            warn!(%challenge_id, "Failed to delete partially submitted challenge: {e}");
            false
        },
    }
}
