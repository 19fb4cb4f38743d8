use clap::ValueEnum;
use crate::enums::request_status::RequestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    /// `None` means no `status` query parameter.
    pub fn as_status(&self) -> Option<RequestStatus> {
        match self {
            Self::All => None,
            Self::Pending => Some(RequestStatus::Pending),
            Self::Approved => Some(RequestStatus::Approved),
            Self::Rejected => Some(RequestStatus::Rejected),
        }
    }
}
