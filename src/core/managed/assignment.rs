/// Direction of a `role add|remove` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentDecision {
    Apply,
    /// Target is a bot account.
    RefuseBot,
    /// Target already has (or already lacks) the role.
    AlreadyInState,
}

/// Decide whether a role change should go through.
///
/// The state check comes first so a bot that already has the role gets the
/// "already has" answer; either way nothing is applied to bots.
pub fn decide_assignment(
    action: AssignmentAction,
    target_is_bot: bool,
    target_has_role: bool,
) -> AssignmentDecision {
    let needs_change = match action {
        AssignmentAction::Add => !target_has_role,
        AssignmentAction::Remove => target_has_role,
    };

    if !needs_change {
        AssignmentDecision::AlreadyInState
    } else if target_is_bot {
        AssignmentDecision::RefuseBot
    } else {
        AssignmentDecision::Apply
    }
}
