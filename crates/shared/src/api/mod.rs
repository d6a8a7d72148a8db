use const_format::concatcp;
pub mod error;
pub mod payloads;

pub const API_BASE_PATH: &str = "/api/";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    User,
    Exercises,
    Programs,
    Program,
    ProgramChallenges,
    ProgramChallenge,
    ProgramSequences,
    ProgramSequence,
    ProgramWorkouts,
    Challenges,
    ChallengesFull,
    Challenge,
    ChallengeFull,
    ChallengeWorkouts,
    ChallengeParticipants,
    Sequences,
    Sequence,
    Workouts,
    Workout,
    Submissions,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            User => concatcp!(API_BASE_PATH, "user"),
            Exercises => concatcp!(API_BASE_PATH, "exercises"),
            Programs => concatcp!(API_BASE_PATH, "programs"),
            Program => concatcp!(API_BASE_PATH, "programs/:id"),
            ProgramChallenges => concatcp!(API_BASE_PATH, "programs/:id/challenges"),
            ProgramChallenge => concatcp!(API_BASE_PATH, "programs/:id/challenges/:challenge_id"),
            ProgramSequences => concatcp!(API_BASE_PATH, "programs/:id/sequences"),
            ProgramSequence => concatcp!(API_BASE_PATH, "programs/:id/sequences/:sequence_id"),
            ProgramWorkouts => {
                concatcp!(API_BASE_PATH, "programs/:id/sequences/:sequence_id/workouts")
            },
            Challenges => concatcp!(API_BASE_PATH, "challenges"),
            ChallengesFull => concatcp!(API_BASE_PATH, "challenges/full"),
            Challenge => concatcp!(API_BASE_PATH, "challenges/:id"),
            ChallengeFull => concatcp!(API_BASE_PATH, "challenges/:id/full"),
            ChallengeWorkouts => concatcp!(API_BASE_PATH, "challenges/:id/workouts"),
            ChallengeParticipants => concatcp!(API_BASE_PATH, "challenges/:id/participants"),
            Sequences => concatcp!(API_BASE_PATH, "challenges/:id/sequences"),
            Sequence => concatcp!(API_BASE_PATH, "challenges/:id/sequences/:sequence_id"),
            Workouts => concatcp!(API_BASE_PATH, "challenges/:id/sequences/:sequence_id/workouts"),
            Workout => concatcp!(
                API_BASE_PATH,
                "challenges/:id/sequences/:sequence_id/workouts/:workout_id"
            ),
            Submissions => concatcp!(
                API_BASE_PATH,
                "challenges/:id/sequences/:sequence_id/workouts/:workout_id/submissions"
            ),
        }
    }

    /// The path with its `:param` segments filled in order from `ids`
    pub fn url<T: ToString>(&self, ids: &[T]) -> String {
        fill_path(self.path(), ids)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Auth {
    Register,
    Login,
    Logout,
}

impl Auth {
    pub const fn path(&self) -> &str {
        use Auth::*;
        match self {
            Register => concatcp!(API_BASE_PATH, "auth/register"),
            Login => concatcp!(API_BASE_PATH, "auth/login"),
            Logout => concatcp!(API_BASE_PATH, "auth/logout"),
        }
    }
}

fn fill_path<T: ToString>(path: &str, ids: &[T]) -> String {
    let mut ids = ids.iter();
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(_) => ids.next().map(ToString::to_string).unwrap_or_else(|| segment.to_owned()),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_url_fills_params_in_order() {
        assert_eq!(Object::Challenges.url::<&str>(&[]), "/api/challenges");
        assert_eq!(Object::Challenge.url(&["abc"]), "/api/challenges/abc");
        assert_eq!(
            Object::Workout.url(&["c", "s", "w"]),
            "/api/challenges/c/sequences/s/workouts/w"
        );
    }

    #[test]
    fn test_url_leaves_missing_params() {
        assert_eq!(Object::Sequence.url(&["c"]), "/api/challenges/c/sequences/:sequence_id");
    }
}
