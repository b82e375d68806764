/// A single commit of `git log` output: its id and everything up to the next header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitBlock<'a> {
    pub id: &'a str,
    pub body: &'a str,
}

const HEADER_PREFIX: &str = "commit ";
const ID_LEN: usize = 40;

/// Returns the commit id when `line` is exactly `commit <40 hex chars>`.
pub fn commit_header_id(line: &str) -> Option<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.len() != HEADER_PREFIX.len() + ID_LEN {
        return None;
    }
    if !line.get(..HEADER_PREFIX.len())?.eq_ignore_ascii_case(HEADER_PREFIX) {
        return None;
    }
    let id = line.get(HEADER_PREFIX.len()..)?;
    id.bytes().all(|b| b.is_ascii_hexdigit()).then_some(id)
}

/// Splits concatenated log output into commit blocks, in order. Text before
/// the first header is dropped, and so is any header with a blank body.
pub fn split_commits(log: &str) -> Vec<CommitBlock<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<(&str, usize)> = None;
    let mut offset = 0;

    for line in log.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let Some(id) = commit_header_id(line.trim_end_matches('\n')) else {
            continue;
        };
        if let Some((prev_id, body_start)) = current.take() {
            push_block(&mut blocks, prev_id, &log[body_start..start]);
        } else if !log[..start].trim().is_empty() {
            log::debug!("Dropping {} bytes before the first commit header", start);
        }
        current = Some((id, offset));
    }

    if let Some((id, body_start)) = current {
        push_block(&mut blocks, id, &log[body_start..]);
    }
    blocks
}

fn push_block<'a>(blocks: &mut Vec<CommitBlock<'a>>, id: &'a str, body: &'a str) {
    if body.trim().is_empty() {
        log::debug!("Dropping commit {id} with an empty body");
        return;
    }
    blocks.push(CommitBlock { id, body });
}
