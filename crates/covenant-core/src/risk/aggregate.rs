//! Overall risk level and summary text.

use crate::types::{RiskItem, RiskLevel};

/// Roll individual risks up into one level.
///
/// High when there are at least three high risks, or one high risk alongside
/// at least three medium ones. Medium when there is any high risk or at least
/// two medium ones. Low otherwise.
pub fn overall_level(risks: &[RiskItem]) -> RiskLevel {
    let high = count(risks, RiskLevel::High);
    let medium = count(risks, RiskLevel::Medium);

    if high >= 3 || (high >= 1 && medium >= 3) {
        RiskLevel::High
    } else if high >= 1 || medium >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn count(risks: &[RiskItem], level: RiskLevel) -> usize {
    risks.iter().filter(|r| r.level == level).count()
}

struct SummaryTemplate {
    counts: fn(usize, usize, usize, usize) -> String,
    high_heading: &'static str,
    medium_heading: &'static str,
    separator: &'static str,
}

fn zh_counts(total: usize, high: usize, medium: usize, low: usize) -> String {
    format!(
        "本合同共识别出{}个风险点，其中高风险{}个，中风险{}个，低风险{}个。",
        total, high, medium, low
    )
}

fn en_counts(total: usize, high: usize, medium: usize, low: usize) -> String {
    format!(
        "{} risk(s) identified in this contract: {} high, {} medium, {} low.",
        total, high, medium, low
    )
}

const ZH_TEMPLATE: SummaryTemplate = SummaryTemplate {
    counts: zh_counts,
    high_heading: "主要高风险点包括：",
    medium_heading: "主要中风险点包括：",
    separator: "：",
};

const EN_TEMPLATE: SummaryTemplate = SummaryTemplate {
    counts: en_counts,
    high_heading: "Main high risks:",
    medium_heading: "Main medium risks:",
    separator: ": ",
};

/// Maximum medium risks listed when there are no high risks.
const MEDIUM_LISTED: usize = 3;

/// Summary of a set of risks.
///
/// Lists every high risk; when there are none, lists up to three medium
/// risks. Chinese response languages use a Chinese template, all others
/// English. An empty set yields an empty summary.
pub fn summarize(risks: &[RiskItem], language: &str) -> String {
    if risks.is_empty() {
        return String::new();
    }

    let template = if language.starts_with("zh") {
        &ZH_TEMPLATE
    } else {
        &EN_TEMPLATE
    };

    let high: Vec<&RiskItem> = risks.iter().filter(|r| r.level == RiskLevel::High).collect();
    let medium: Vec<&RiskItem> = risks.iter().filter(|r| r.level == RiskLevel::Medium).collect();
    let low = count(risks, RiskLevel::Low);

    let mut summary = (template.counts)(risks.len(), high.len(), medium.len(), low);

    let (heading, listed): (&str, &[&RiskItem]) = if !high.is_empty() {
        (template.high_heading, high.as_slice())
    } else if !medium.is_empty() {
        (template.medium_heading, &medium[..medium.len().min(MEDIUM_LISTED)])
    } else {
        return summary;
    };

    summary.push_str("\n\n");
    summary.push_str(heading);
    for (i, risk) in listed.iter().enumerate() {
        summary.push_str(&format!(
            "\n{}. {}{}{}",
            i + 1,
            risk.risk_type,
            template.separator,
            risk.description
        ));
    }
    summary
}
