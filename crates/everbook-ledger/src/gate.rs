use everbook_types::SenderId;

/// Outcome of the commit mechanism's evaluation of an append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Accepted,
    Rejected { reason: String },
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// The external commit mechanism's accept/reject decision point.
///
/// Every append passes through the gate before it can be recorded. Gates
/// model host-imposed constraints (payload ceilings, caller eligibility),
/// never application-level content rules: the ledger deliberately performs
/// no validation of `name` or `message` text.
pub trait CommitGate: Send + Sync {
    fn evaluate(&self, caller: &SenderId, name: &str, message: &str) -> GateDecision;
}

/// Closure gate, mainly for tests that need scripted rejections.
pub struct FnGate<F>(pub F);

impl<F> CommitGate for FnGate<F>
where
    F: Fn(&SenderId, &str, &str) -> GateDecision + Send + Sync,
{
    fn evaluate(&self, caller: &SenderId, name: &str, message: &str) -> GateDecision {
        (self.0)(caller, name, message)
    }
}

/// Default gate: enforces only the host payload ceiling.
#[derive(Clone, Debug)]
pub struct HostGate {
    /// Combined byte ceiling for `name` + `message`, analogous to a
    /// transport-level message size limit.
    pub max_payload_bytes: usize,
}

impl Default for HostGate {
    fn default() -> Self {
        Self {
            max_payload_bytes: 128 * 1024,
        }
    }
}

impl CommitGate for HostGate {
    fn evaluate(&self, _caller: &SenderId, name: &str, message: &str) -> GateDecision {
        let payload = name.len() + message.len();
        if payload > self.max_payload_bytes {
            return GateDecision::rejected(format!(
                "payload of {payload} bytes exceeds host ceiling of {} bytes",
                self.max_payload_bytes
            ));
        }
        GateDecision::Accepted
    }
}

/// Accepts every append. Used where the embedding host imposes no limits.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;

impl CommitGate for OpenGate {
    fn evaluate(&self, _caller: &SenderId, _name: &str, _message: &str) -> GateDecision {
        GateDecision::Accepted
    }
}
