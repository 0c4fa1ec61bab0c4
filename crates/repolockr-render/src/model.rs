#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub status: RenderableStatus,
    /// Why the check was skipped; only set for `Skip`.
    pub reason: Option<String>,
    pub summary: String,
    pub violating_files: Vec<String>,
}
