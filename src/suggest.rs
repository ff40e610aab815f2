//! "Did you mean" ranking for lookups that missed.

pub const DEFAULT_LIMIT: usize = 5;

/// Returns up to `limit` candidates closest to `query`, case-insensitively.
///
/// Candidates that contain the query (or are contained in it) rank ahead of
/// the rest; within each class the edit distance decides and ties keep the
/// candidates' original order.
pub fn nearest<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.to_lowercase();
    let mut ranked: Vec<(bool, usize, usize, &str)> = Vec::new();
    for (idx, candidate) in candidates.into_iter().enumerate() {
        if ranked.iter().any(|(_, _, _, seen)| *seen == candidate) {
            continue;
        }
        let folded = candidate.to_lowercase();
        let overlaps = folded.contains(&query) || query.contains(&folded);
        ranked.push((!overlaps, levenshtein(&query, &folded), idx, candidate));
    }
    ranked.sort();
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, _, _, name)| name.to_string())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
