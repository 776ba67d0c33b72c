//! npm range semantics on top of `semver::Version` ordering.
//!
//! A range is parsed into a union of intervals, one per `||` alternative. Prerelease versions
//! are always allowed to match: comparisons use plain semver ordering with no prerelease
//! tuple restriction. Build metadata is ignored.
//!
//! Every public function is total: text that does not parse yields `false` / `None`.

use semver::{BuildMetadata, Prerelease, Version};
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;

/// Comparator kept by autofix when rewriting a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Exact,
    Caret,
    Tilde,
    Greater,
    GreaterEq,
}

impl Operator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operator::Exact => "",
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::Greater => ">",
            Operator::GreaterEq => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range \"{range}\": {reason}")]
pub struct RangeError {
    range: String,
    reason: &'static str,
}

impl RangeError {
    fn new(range: &str, reason: &'static str) -> Self {
        Self {
            range: range.to_string(),
            reason,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Bound {
    Unbounded,
    Inclusive(Version),
    Exclusive(Version),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Interval {
    lower: Bound,
    upper: Bound,
}

impl Interval {
    fn full() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    fn new(lower: Bound, upper: Bound) -> Option<Self> {
        let interval = Self { lower, upper };
        (!interval.is_empty()).then_some(interval)
    }

    fn contains(&self, v: &Version) -> bool {
        let above = match &self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(l) => v >= l,
            Bound::Exclusive(l) => v > l,
        };
        let below = match &self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(u) => v <= u,
            Bound::Exclusive(u) => v < u,
        };
        above && below
    }

    fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (_, Bound::Unbounded) => false,
            (Bound::Unbounded, Bound::Inclusive(_)) => false,
            (Bound::Unbounded, Bound::Exclusive(u)) => *u <= lowest(),
            (Bound::Inclusive(l), Bound::Inclusive(u)) => l > u,
            (
                Bound::Inclusive(l) | Bound::Exclusive(l),
                Bound::Inclusive(u) | Bound::Exclusive(u),
            ) => l >= u,
        }
    }

    fn intersect(&self, other: &Interval) -> Option<Interval> {
        Interval::new(
            stricter_lower(&self.lower, &other.lower),
            stricter_upper(&self.upper, &other.upper),
        )
    }

    /// Lowest version this interval can denote.
    fn floor(&self) -> Option<Version> {
        let candidate = match &self.lower {
            Bound::Unbounded => lowest(),
            Bound::Inclusive(v) => v.clone(),
            Bound::Exclusive(v) => successor(v),
        };
        self.contains(&candidate).then_some(candidate)
    }
}

fn bound_version(bound: &Bound) -> Option<&Version> {
    match bound {
        Bound::Unbounded => None,
        Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
    }
}

fn stricter_lower(a: &Bound, b: &Bound) -> Bound {
    match (bound_version(a), bound_version(b)) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(va), Some(vb)) if va != vb => {
            if va > vb {
                a.clone()
            } else {
                b.clone()
            }
        }
        _ => {
            if matches!(a, Bound::Exclusive(_)) {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

fn stricter_upper(a: &Bound, b: &Bound) -> Bound {
    match (bound_version(a), bound_version(b)) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(va), Some(vb)) if va != vb => {
            if va < vb {
                a.clone()
            } else {
                b.clone()
            }
        }
        _ => {
            if matches!(a, Bound::Exclusive(_)) {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}

/// `0.0.0-0`, the smallest version semver can express.
fn lowest() -> Version {
    floor_version(0, 0, 0)
}

/// `M.m.p-0`: below every prerelease of `M.m.p`.
fn floor_version(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = Version::new(major, minor, patch);
    v.pre = Prerelease::new("0").unwrap_or_default();
    v
}

fn successor(v: &Version) -> Version {
    let mut next = v.clone();
    if v.pre.is_empty() {
        next.patch = v.patch.saturating_add(1);
    } else {
        next.pre = Prerelease::new(&format!("{}.0", v.pre)).unwrap_or_else(|_| v.pre.clone());
    }
    next
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cmp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Caret,
    Tilde,
}

/// A possibly incomplete version such as `1`, `1.2.x` or `1.2.3-beta.1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
    build: BuildMetadata,
}

impl Partial {
    fn parse(text: &str, range: &str) -> Result<Partial, RangeError> {
        let text = text.trim();
        let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
        if text.is_empty() {
            return Ok(Partial::default());
        }

        let (rest, build) = text.split_once('+').unwrap_or((text, ""));
        let (core, pre) = rest.split_once('-').unwrap_or((rest, ""));

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(RangeError::new(range, "too many version components"));
        }

        let mut numbers = [None; 3];
        let mut wildcard_seen = false;
        for (slot, part) in numbers.iter_mut().zip(parts) {
            if matches!(part, "x" | "X" | "*") {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RangeError::new(range, "invalid version component"));
            }
            *slot = Some(
                part.parse::<u64>()
                    .map_err(|_| RangeError::new(range, "version component out of range"))?,
            );
        }

        let [major, minor, patch] = numbers;
        let complete = patch.is_some();
        if (!pre.is_empty() || !build.is_empty()) && !complete {
            return Err(RangeError::new(range, "prerelease on an incomplete version"));
        }

        Ok(Partial {
            major,
            minor,
            patch,
            pre: Prerelease::new(pre).map_err(|_| RangeError::new(range, "invalid prerelease"))?,
            build: BuildMetadata::new(build)
                .map_err(|_| RangeError::new(range, "invalid build metadata"))?,
        })
    }

    /// Missing components become `0`; build metadata is dropped.
    fn floor(&self) -> Version {
        let mut v = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        v.pre = self.pre.clone();
        v
    }

    /// Inclusive lower bound: an incomplete version starts below its own prereleases
    /// (`1.2` is `1.2.0-0`).
    fn lower(&self) -> Version {
        match self.patch {
            Some(_) => self.floor(),
            None => floor_version(self.major.unwrap_or(0), self.minor.unwrap_or(0), 0),
        }
    }

    /// Same as `floor` but keeping build metadata, for rewriting.
    fn to_version_text(&self) -> String {
        let mut v = self.floor();
        v.build = self.build.clone();
        v.to_string()
    }

    /// Exclusive upper bound of `<=` on this partial.
    fn upper_inclusive(&self) -> Bound {
        match (self.major, self.minor, self.patch) {
            (None, _, _) => Bound::Unbounded,
            (Some(major), None, _) => {
                Bound::Exclusive(floor_version(major.saturating_add(1), 0, 0))
            }
            (Some(major), Some(minor), None) => {
                Bound::Exclusive(floor_version(major, minor.saturating_add(1), 0))
            }
            _ => Bound::Inclusive(self.floor()),
        }
    }
}

fn desugar(cmp: Cmp, p: &Partial) -> Option<Interval> {
    use Bound::{Exclusive, Inclusive, Unbounded};

    let Some(major) = p.major else {
        return match cmp {
            Cmp::Gt | Cmp::Lt => None,
            _ => Some(Interval::full()),
        };
    };

    match cmp {
        Cmp::Eq => match (p.minor, p.patch) {
            (None, _) | (Some(_), None) => Interval::new(Inclusive(p.lower()), p.upper_inclusive()),
            _ => Interval::new(Inclusive(p.floor()), Inclusive(p.floor())),
        },
        Cmp::Caret => {
            let upper = match (p.minor, p.patch) {
                (None, _) => floor_version(major.saturating_add(1), 0, 0),
                _ if major > 0 => floor_version(major.saturating_add(1), 0, 0),
                (Some(minor), None) => floor_version(0, minor.saturating_add(1), 0),
                (Some(minor), Some(_)) if minor > 0 => {
                    floor_version(0, minor.saturating_add(1), 0)
                }
                (Some(_), Some(patch)) => floor_version(0, 0, patch.saturating_add(1)),
            };
            Interval::new(Inclusive(p.lower()), Exclusive(upper))
        }
        Cmp::Tilde => {
            let upper = match p.minor {
                None => floor_version(major.saturating_add(1), 0, 0),
                Some(minor) => floor_version(major, minor.saturating_add(1), 0),
            };
            Interval::new(Inclusive(p.lower()), Exclusive(upper))
        }
        Cmp::Gt => {
            let lower = match (p.minor, p.patch) {
                (None, _) => Inclusive(floor_version(major.saturating_add(1), 0, 0)),
                (Some(minor), None) => Inclusive(floor_version(major, minor.saturating_add(1), 0)),
                _ => Exclusive(p.floor()),
            };
            Interval::new(lower, Unbounded)
        }
        Cmp::Gte => Interval::new(Inclusive(p.lower()), Unbounded),
        Cmp::Lt => {
            let upper = match (p.minor, p.patch) {
                (None, _) => floor_version(major, 0, 0),
                (Some(minor), None) => floor_version(major, minor, 0),
                _ => p.floor(),
            };
            Interval::new(Unbounded, Exclusive(upper))
        }
        Cmp::Lte => Interval::new(Unbounded, p.upper_inclusive()),
    }
}

/// Split a leading comparator off a single term.
fn split_operator(term: &str) -> (Cmp, &str) {
    const PREFIXES: [(&str, Cmp); 9] = [
        (">=", Cmp::Gte),
        ("<=", Cmp::Lte),
        ("~>", Cmp::Tilde),
        (">", Cmp::Gt),
        ("<", Cmp::Lt),
        ("=", Cmp::Eq),
        ("^", Cmp::Caret),
        ("~", Cmp::Tilde),
        ("", Cmp::Eq),
    ];
    PREFIXES
        .iter()
        .find_map(|(prefix, cmp)| term.strip_prefix(*prefix).map(|rest| (*cmp, rest)))
        .unwrap_or((Cmp::Eq, term))
}

/// Whitespace-separated comparators, with operators glued to the following version
/// (`>= 1.2.3 < 2` becomes `>=1.2.3`, `<2`).
fn comparator_terms(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut pending = String::new();
    for token in text.split_whitespace() {
        pending.push_str(token);
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            continue;
        }
        terms.push(std::mem::take(&mut pending));
    }
    if !pending.is_empty() {
        terms.push(pending);
    }
    terms
}

fn parse_alternative(text: &str, range: &str) -> Result<Option<Interval>, RangeError> {
    let text = text.trim();

    if let Some((from, to)) = text.split_once(" - ") {
        let from = Partial::parse(from, range)?;
        let to = Partial::parse(to, range)?;
        let lower = match from.major {
            None => Bound::Unbounded,
            Some(_) => Bound::Inclusive(from.lower()),
        };
        return Ok(Interval::new(lower, to.upper_inclusive()));
    }

    let mut interval = Some(Interval::full());
    for term in comparator_terms(text) {
        let (cmp, version) = split_operator(&term);
        if cmp != Cmp::Eq && version.trim().is_empty() {
            return Err(RangeError::new(range, "operator without version"));
        }
        let partial = Partial::parse(version, range)?;
        let desugared = desugar(cmp, &partial);
        interval = match (interval, desugared) {
            (Some(current), Some(next)) => current.intersect(&next),
            _ => None,
        };
    }
    Ok(interval)
}

/// Union of intervals denoted by an npm range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    intervals: Vec<Interval>,
}

impl Range {
    pub fn parse(text: &str) -> Result<Range, RangeError> {
        let mut intervals = Vec::new();
        for alternative in text.split("||") {
            if let Some(interval) = parse_alternative(alternative, text)? {
                intervals.push(interval);
            }
        }
        Ok(Range { intervals })
    }

    pub fn matches(&self, version: &Version) -> bool {
        let version = without_build(version);
        self.intervals.iter().any(|i| i.contains(&version))
    }

    pub fn intersects(&self, other: &Range) -> bool {
        self.intervals
            .iter()
            .any(|a| other.intervals.iter().any(|b| a.intersect(b).is_some()))
    }

    /// Lowest version the range can denote, preferring `0.0.0` over its prereleases.
    pub fn min_version(&self) -> Option<Version> {
        let zero = Version::new(0, 0, 0);
        if self.matches(&zero) {
            return Some(zero);
        }
        self.intervals
            .iter()
            .filter_map(Interval::floor)
            .map(|floor| self.release_of_floor(floor))
            .min()
    }

    /// `M.m.p-0` floors coming from incomplete versions are reported as `M.m.p`.
    fn release_of_floor(&self, floor: Version) -> Version {
        if floor.pre.as_str() != "0" {
            return floor;
        }
        let release = Version::new(floor.major, floor.minor, floor.patch);
        if self.matches(&release) { release } else { floor }
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::parse(s)
    }
}

fn without_build(version: &Version) -> Cow<'_, Version> {
    if version.build.is_empty() {
        Cow::Borrowed(version)
    } else {
        let mut v = version.clone();
        v.build = BuildMetadata::EMPTY;
        Cow::Owned(v)
    }
}

/// Strip pseudo-protocols down to the comparable range.
///
/// - `npm:<name>@<rest>` becomes `<rest>`
/// - `workspace:<rest>` becomes `<rest>`, with `workspace:`, `workspace:^` and
///   `workspace:~` meaning `*`
/// - everything else (including `file:`) is returned untouched
pub fn normalize(range: &str) -> Cow<'_, str> {
    let trimmed = range.trim();
    if let Some(alias) = trimmed.strip_prefix("npm:") {
        // Skip the first byte so a scoped name's leading `@` is not taken as the separator.
        if let Some(at) = alias.get(1..).and_then(|rest| rest.find('@')) {
            return Cow::Borrowed(&alias[at + 2..]);
        }
        return Cow::Borrowed("*");
    }
    if let Some(rest) = trimmed.strip_prefix("workspace:") {
        return match rest.trim() {
            "" | "^" | "~" | "*" => Cow::Borrowed("*"),
            other => Cow::Borrowed(other),
        };
    }
    Cow::Borrowed(trimmed)
}

/// Path-like references that are never compared numerically.
pub fn is_local_reference(range: &str) -> bool {
    let trimmed = range.trim_start();
    ["file:", "link:", "portal:", "workspace:"]
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

/// Parse a concrete version, accepting a leading `=` or `v`.
pub fn parse_version(text: &str) -> Option<Version> {
    let text = text.trim();
    let text = text.strip_prefix('=').unwrap_or(text).trim_start();
    let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
    Version::parse(text).ok()
}

pub fn is_exact_version(range: &str) -> bool {
    parse_version(&normalize(range)).is_some()
}

/// Declared with `^`, `~`, `>` or `<` once pseudo-protocols are stripped.
pub fn has_range_operator(range: &str) -> bool {
    normalize(range).starts_with(['^', '~', '>', '<'])
}

fn is_any(range: &str) -> bool {
    matches!(range.trim(), "" | "*" | "x" | "X")
}

pub fn satisfies(version: &str, range: &str) -> bool {
    let range = normalize(range);
    if is_any(&range) {
        return true;
    }
    let Some(version) = parse_version(&normalize(version)) else {
        return false;
    };
    Range::parse(&range).is_ok_and(|r| r.matches(&version))
}

pub fn intersects(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if is_any(&a) || is_any(&b) {
        return true;
    }
    match (Range::parse(&a), Range::parse(&b)) {
        (Ok(a), Ok(b)) => a.intersects(&b),
        _ => false,
    }
}

pub fn min_version(range: &str) -> Option<Version> {
    Range::parse(&normalize(range)).ok()?.min_version()
}

/// A single comparator term, such as `^1.2.3` or `>=2`.
fn single_term(range: &str) -> Option<(Operator, Partial)> {
    let normalized = normalize(range);
    if normalized.contains("||") || normalized.contains(" - ") {
        return None;
    }
    let terms = comparator_terms(&normalized);
    let [term] = terms.as_slice() else {
        return None;
    };
    let (cmp, version) = split_operator(term);
    let operator = match cmp {
        Cmp::Eq => Operator::Exact,
        Cmp::Caret => Operator::Caret,
        Cmp::Tilde => Operator::Tilde,
        Cmp::Gt => Operator::Greater,
        Cmp::Gte => Operator::GreaterEq,
        Cmp::Lt | Cmp::Lte => return None,
    };
    let partial = Partial::parse(version, range).ok()?;
    partial.major.map(|_| (operator, partial))
}

pub fn get_operator(range: &str) -> Option<Operator> {
    single_term(range).map(|(operator, _)| operator)
}

/// Rewrite a single-term range with another comparator, padding missing components.
pub fn with_operator(range: &str, operator: Operator) -> Option<String> {
    let (_, partial) = single_term(range)?;
    Some(format!("{}{}", operator.as_str(), partial.to_version_text()))
}

/// Best-effort exact version for a range when nothing better is known: the comparator is
/// stripped and the version zero-padded to three components.
pub fn exact_from_range(range: &str) -> String {
    let normalized = normalize(range);
    let stripped = normalized
        .trim()
        .trim_start_matches(['^', '~', '>', '<', '=', 'v', ' ']);
    let token = stripped.split_whitespace().next().unwrap_or_default();
    let split_at = token.find(['-', '+']).unwrap_or(token.len());
    let (core, suffix) = token.split_at(split_at);

    let mut parts: Vec<&str> = core
        .split('.')
        .map(|p| if matches!(p, "x" | "X" | "*" | "") { "0" } else { p })
        .collect();
    parts.resize(3, "0");
    format!("{}{}", parts[..3].join("."), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).expect("valid version")
    }

    fn range(text: &str) -> Range {
        Range::parse(text).expect("valid range")
    }

    #[test]
    fn caret_follows_npm_desugaring() {
        let r = range("^1.2.3");
        assert!(r.matches(&v("1.2.3")));
        assert!(r.matches(&v("1.9.0")));
        assert!(!r.matches(&v("2.0.0")));
        assert!(!r.matches(&v("2.0.0-alpha")));

        let r = range("^0.2.3");
        assert!(r.matches(&v("0.2.9")));
        assert!(!r.matches(&v("0.3.0")));

        let r = range("^0.0.3");
        assert!(r.matches(&v("0.0.3")));
        assert!(!r.matches(&v("0.0.4")));

        let r = range("^0.x");
        assert!(r.matches(&v("0.9.0")));
        assert!(!r.matches(&v("1.0.0")));
    }

    #[test]
    fn tilde_and_x_ranges() {
        assert!(range("~1.2.3").matches(&v("1.2.9")));
        assert!(!range("~1.2.3").matches(&v("1.3.0")));
        assert!(range("~>1.2").matches(&v("1.2.0")));
        assert!(range("1.x").matches(&v("1.99.0")));
        assert!(!range("1.x").matches(&v("2.0.0")));
        assert!(range("1.2.*").matches(&v("1.2.7")));
        assert!(range("*").matches(&v("0.0.1")));
        assert!(range("").matches(&v("12.0.0")));
    }

    #[test]
    fn partial_comparators() {
        assert!(range(">1.2").matches(&v("1.3.0")));
        assert!(!range(">1.2").matches(&v("1.2.9")));
        assert!(!range("<1.2").matches(&v("1.2.0-beta")));
        assert!(range("<=1.2").matches(&v("1.2.9")));
        assert!(!range("<=1.2").matches(&v("1.3.0")));
        assert!(range(">= 1.2.3 < 2").matches(&v("1.5.0")));
        assert!(!range(">= 1.2.3 < 2").matches(&v("2.0.0")));
    }

    #[test]
    fn hyphen_and_union() {
        let r = range("1.2.3 - 2.3");
        assert!(r.matches(&v("2.3.9")));
        assert!(!r.matches(&v("2.4.0")));
        assert!(!r.matches(&v("1.2.2")));

        let r = range("^1.0.0 || ^3.0.0");
        assert!(r.matches(&v("3.1.0")));
        assert!(!r.matches(&v("2.0.0")));
    }

    #[test]
    fn prereleases_are_always_included() {
        assert!(satisfies("1.3.0-beta.1", "^1.2.0"));
        assert!(satisfies("2.0.0-alpha.3", ">=1.0.0"));
        assert!(satisfies("1.0.0-rc.1", "1.0.0-rc.1"));
        assert!(!satisfies("1.0.0-rc.1", "^1.0.0"));
    }

    #[test]
    fn prereleases_match_incomplete_versions() {
        assert!(satisfies("1.2.0-beta.1", "^1.2"));
        assert!(intersects("1.2.0-beta.1", "^1.2"));
        assert!(satisfies("1.0.0-alpha.1", "1.x"));
        assert!(satisfies("2.0.0-beta.3", "^2"));
        assert!(intersects("2.0.0-beta.3", "^2"));
        assert!(satisfies("1.2.0-rc.1", ">=1.2"));
        assert!(satisfies("1.2.0-rc.1", "~1.2"));
        assert!(satisfies("2.0.0-rc.1", ">1"));
        assert!(satisfies("1.2.0-rc.1", "1.2 - 2"));
        assert!(!satisfies("1.1.9", "^1.2"));
        assert!(!satisfies("3.0.0-rc.1", "^2"));
    }

    #[test]
    fn satisfies_is_total() {
        assert!(!satisfies("not-a-version", "^1.0.0"));
        assert!(!satisfies("1.0.0", "latest"));
        assert!(!satisfies("1.0.0", "github:user/repo"));
        assert!(satisfies("anything", "*"));
        assert!(satisfies("npm:other@1.2.0", "^1.0.0"));
    }

    #[test]
    fn intersects_ranges() {
        assert!(intersects("^1.0.0", "1.5.0"));
        assert!(intersects("^1.0.0", ">=1.9.0 <3"));
        assert!(!intersects("^1.0.0", "^2.0.0"));
        assert!(!intersects(">1.0.0", "<=1.0.0"));
        assert!(intersects("workspace:*", "^9.0.0"));
        assert!(!intersects("file:../a", "^1.0.0"));
    }

    #[test]
    fn min_version_matches_npm() {
        assert_eq!(min_version("^1.2.3"), Some(v("1.2.3")));
        assert_eq!(min_version(">1.2.3"), Some(v("1.2.4")));
        assert_eq!(min_version(">1.2.3-beta"), Some(v("1.2.3-beta.0")));
        assert_eq!(min_version("<2.0.0"), Some(v("0.0.0")));
        assert_eq!(min_version("1.x || >=3"), Some(v("1.0.0")));
        assert_eq!(min_version("^1.2"), Some(v("1.2.0")));
        assert_eq!(min_version(">1"), Some(v("2.0.0")));
        assert_eq!(min_version("1.2 - 2"), Some(v("1.2.0")));
        assert_eq!(min_version(">5 <3"), None);
        assert_eq!(min_version("file:../a"), None);
    }

    #[test]
    fn normalize_strips_pseudo_protocols() {
        assert_eq!(normalize("npm:rollup@^2.0.0"), "^2.0.0");
        assert_eq!(normalize("npm:@scope/pkg@1.0.0"), "1.0.0");
        assert_eq!(normalize("workspace:^"), "*");
        assert_eq!(normalize("workspace:"), "*");
        assert_eq!(normalize("workspace:^1.2.0"), "^1.2.0");
        assert_eq!(normalize("file:../lib"), "file:../lib");
    }

    #[test]
    fn exactness() {
        assert!(is_exact_version("1.2.3"));
        assert!(is_exact_version("=1.2.3"));
        assert!(is_exact_version("npm:rollup@2.0.0"));
        assert!(!is_exact_version("^1.2.3"));
        assert!(!is_exact_version("1.2"));
        assert!(has_range_operator("npm:rollup@^2.0.0"));
        assert!(!has_range_operator("1.x"));
    }

    #[test]
    fn operators() {
        assert_eq!(get_operator("^1.2.3"), Some(Operator::Caret));
        assert_eq!(get_operator("~1.2"), Some(Operator::Tilde));
        assert_eq!(get_operator(">=1.0.0"), Some(Operator::GreaterEq));
        assert_eq!(get_operator("1.0.0"), Some(Operator::Exact));
        assert_eq!(get_operator("<1.0.0"), None);
        assert_eq!(get_operator("^1.0.0 || ^2.0.0"), None);
        assert_eq!(get_operator(">=1 <2"), None);
        assert_eq!(get_operator("*"), None);

        assert_eq!(with_operator("1.2.0", Operator::Caret).as_deref(), Some("^1.2.0"));
        assert_eq!(with_operator("^1", Operator::Tilde).as_deref(), Some("~1.0.0"));
        assert_eq!(
            with_operator("~1.2.3-beta.1+build.5", Operator::Exact).as_deref(),
            Some("1.2.3-beta.1+build.5")
        );
        assert_eq!(with_operator("<1.2.0", Operator::Caret), None);
    }

    #[test]
    fn exact_from_range_pads_components() {
        assert_eq!(exact_from_range("^1"), "1.0.0");
        assert_eq!(exact_from_range("~1.2"), "1.2.0");
        assert_eq!(exact_from_range(">=2.3.4"), "2.3.4");
        assert_eq!(exact_from_range("^1.0.0-beta.2"), "1.0.0-beta.2");
    }

    #[test]
    fn invalid_ranges_are_errors() {
        assert!(Range::parse("^").is_err());
        assert!(Range::parse("1.2.3.4").is_err());
        assert!(Range::parse("1.x.3").is_err());
        assert!(Range::parse("latest").is_err());
    }
}
