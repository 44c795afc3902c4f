use serde::Serialize;

// ============================================================================
// Form State Machine
// ============================================================================
//
//   Clean ──edit──▶ DirtyValid ◀──edit──▶ DirtyInvalid
//                       │
//                    submit
//                       ▼
//                  Submitting ──ok──▶ Submitted
//                       │
//                      err
//                       ▼
//                    Failed ──submit (still dirty and valid)──▶ Submitting
//
// Editing back to the loaded values returns to Clean.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Clean,
    DirtyInvalid,
    DirtyValid,
    Submitting,
    Submitted,
    Failed,
}

impl FormState {
    /// State after a field edit, given how the values now compare.
    pub fn after_edit(self, dirty: bool, valid: bool) -> Self {
        match (dirty, valid) {
            (false, _) => FormState::Clean,
            (true, true) => FormState::DirtyValid,
            (true, false) => FormState::DirtyInvalid,
        }
    }

    /// Whether a submission may start from this state.
    pub fn can_submit(self, dirty: bool, valid: bool) -> bool {
        match self {
            FormState::DirtyValid => true,
            FormState::Failed => dirty && valid,
            FormState::Clean
            | FormState::DirtyInvalid
            | FormState::Submitting
            | FormState::Submitted => false,
        }
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormState::Clean => "clean",
            FormState::DirtyInvalid => "dirty and invalid",
            FormState::DirtyValid => "dirty and valid",
            FormState::Submitting => "submitting",
            FormState::Submitted => "submitted",
            FormState::Failed => "failed",
        };
        f.write_str(name)
    }
}
