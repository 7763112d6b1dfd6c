use crate::compare::ComparisonResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRequest {
    pub generation: u64,
    pub from: String,
    pub to: String,
}

#[derive(Debug)]
pub struct CompareResponse {
    pub generation: u64,
    pub result: Result<ComparisonResult, String>,
}
