// Maximum number of extra fee line items accepted per component
// A breakdown past this size indicates a malformed upstream response
// rather than a legitimate fee schedule
pub const MAX_FEE_EXTRAS: usize = 64;
// Maximum number of free-form notes per response
pub const MAX_NOTES: usize = 32;
// Maximum number of chunks a chunked transaction estimate may span
pub const MAX_CHUNKS: usize = 20;
