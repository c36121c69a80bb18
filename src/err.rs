use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum PipeErr {
    #[error("[Sort] Invalid sort direction `{0}`, expect one of `asc`, `desc`, `1`, `-1`")]
    ParseSortDirectionErr(String),

    #[error("[Sort] Invalid sort direction number `{0}`, expect `1` or `-1`")]
    SortDirectionNumErr(i64),

    #[error("[Regex] Compile regex `{reg}` error: {err}")]
    ParseRegexErr { reg: String, err: String },

    #[error("[Join] Chunk size of join must be greater than zero")]
    ZeroChunkSize,
}

impl PipeErr {
    /// 错误码，按照声明顺序从1开始编号。
    pub fn code(&self) -> u8 {
        match self {
            PipeErr::ParseSortDirectionErr(_) => 1,
            PipeErr::SortDirectionNumErr(_) => 2,
            PipeErr::ParseRegexErr { .. } => 3,
            PipeErr::ZeroChunkSize => 4,
        }
    }
}
