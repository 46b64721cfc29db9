use biaslens::{
    analyze, get_rating_info, highlight, rewrite, Analyzer, Rating, SpanKind, WordListSentiment,
};

// Full texts of the six sample ballot proposals the pipeline was tuned on.
const PROPOSALS: [&str; 6] = [
    "This proposal would allow the expansion of new ski trails in the Olympic Sports Complex \
     in Essex County, New York. The Olympic Sport Complex is in state forest preserve land. \
     This proposal would also require New York State to add 2,500 acres of protected forest \
     land to Adirondack Park.",
    "Fast track publicly financed affordable housing. Fast track applications delivering \
     affordable housing in the community districts that produce the least affordable housing, \
     significantly reducing review time. Maintain Community Board review. Yes fast tracks \
     applications at the Board of Standards and Appeals or City Planning Commission. No leaves \
     affordable housing subject to longer review and final decision at City Council.",
    "Simplify review of modest amounts of additional housing and minor infrastructure projects, \
     significantly reducing review time. Maintain Community Board review, with final decision \
     by the City Planning Commission. Yes simplifies review for limited land-use changes, \
     including modest housing and minor infrastructure projects. No leaves these changes \
     subject to longer review, with final decision by City Council.",
    "Establish an Affordable Housing Appeals Board with the Council Speaker, local Borough \
     President, and Mayor to review Council actions that reject or change applications creating \
     affordable housing. Yes creates the three-member Affordable Housing Appeals Board to \
     reflect Council, borough, and citywide perspectives. No leaves affordable housing subject \
     to the Mayor's veto and final decision by City Council.",
    "Consolidate borough map office and address assignment functions, and create one digital \
     City Map at Department of City Planning. Today, the City Map consists of paper maps across \
     five offices. Yes creates a consolidated, digital City Map. No leaves in place five \
     separate map and address assignment functions, administered by Borough President Offices.",
    "Move the City's primary and general election dates so that City elections are held in the \
     same year as Federal Presidential elections, when permitted by state law. Yes moves City \
     elections to the same year as Federal Presidential elections, when permitted by state law. \
     No leaves laws unchanged.",
];

const LOADED_TEXT: &str =
    "Fast track affordable housing. Fast track applications... significantly reducing review time.";

const NEUTRAL_TEXT: &str = "This proposal would move election dates for city offices to the \
                            same year as federal presidential elections.";

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

#[test]
fn neutral_proposal_scores_100() {
    let result = analyze(NEUTRAL_TEXT);
    assert_eq!(
        result.score, 100,
        "hedged descriptive text should clamp at 100, got {}",
        result.score
    );
    assert_eq!(result.rating, Rating::Neutral);
    assert!(
        result.bias_score <= 0,
        "neutral indicators should drive the bias score negative, got {}",
        result.bias_score
    );
    assert_eq!(
        result.reasons,
        vec!["Language appears relatively neutral and factual".to_string()]
    );
}

#[test]
fn loaded_proposal_is_not_neutral() {
    let result = analyze(LOADED_TEXT);
    assert!(
        result.score < 80,
        "loaded text should fall below the mostly-neutral threshold, got {}",
        result.score
    );
    assert_eq!(result.rating, Rating::NotNeutral);
    assert!(
        result
            .reasons
            .iter()
            .any(|r| r.starts_with("Contains positive/loaded language")),
        "should report the positive-lexicon hits, got {:?}",
        result.reasons
    );
}

#[test]
fn empty_input_returns_sentinel() {
    let result = analyze("");
    assert_eq!(result.score, 0);
    assert_eq!(result.rating, Rating::NotNeutral);
    assert_eq!(result.reasons, vec!["Invalid text input".to_string()]);
}

#[test]
fn score_is_always_in_range() {
    let extreme = "This dangerous corrupt disaster must fail. The worst unjust attack will \
                   destroy everything and waste the most money immediately.";
    for text in PROPOSALS.iter().chain([LOADED_TEXT, NEUTRAL_TEXT, extreme].iter()) {
        let result = analyze(text);
        assert!(
            (0..=100).contains(&result.score),
            "score out of range for {text:?}: {}",
            result.score
        );
    }
}

#[test]
fn injecting_a_negative_term_lowers_the_score() {
    let base = "The committee would review the proposal next month.";
    let injected = "The committee would review the proposal next month. The current process is \
                    a disaster.";
    let base_score = analyze(base).score;
    let injected_score = analyze(injected).score;
    assert!(
        injected_score < base_score,
        "adding a negative-lexicon term should lower the score: {base_score} -> {injected_score}"
    );
}

#[test]
fn every_occurrence_of_a_loaded_term_accumulates() {
    let once = analyze("The plan would cut funding.");
    let twice = analyze("The plan would cut and cut funding.");
    assert!(
        twice.score < once.score,
        "a term appearing twice must weigh twice: {} vs {}",
        once.score,
        twice.score
    );
}

#[test]
fn repeated_words_are_reported() {
    let text = "Housing housing housing means zoning zoning zoning under budget budget budget \
                rules.";
    let result = analyze(text);
    assert!(
        result
            .reasons
            .iter()
            .any(|r| r.starts_with("Excessive repetition of words")),
        "three distinct repeated words should emit a reason, got {:?}",
        result.reasons
    );
}

#[test]
fn extended_mode_flags_npov_violations() {
    let text = "We must act because everyone knows this is essential.";
    let base = analyze(text);
    let extended = Analyzer::new().extended(true).analyze(text);

    assert_eq!(base.has_npov_violations, None);
    assert_eq!(extended.has_npov_violations, Some(true));
    assert!(
        extended.score < base.score,
        "extended rules should add bias: base {} vs extended {}",
        base.score,
        extended.score
    );
    assert!(
        extended
            .reasons
            .iter()
            .any(|r| r.starts_with("Wikipedia NPOV: Uses editorial voice")),
        "first-person pronouns should be reported, got {:?}",
        extended.reasons
    );
}

#[test]
fn extended_mode_without_hits_reports_no_violations() {
    let result = Analyzer::new().extended(true).analyze(NEUTRAL_TEXT);
    assert_eq!(result.has_npov_violations, Some(false));
}

#[test]
fn sentiment_scorer_adds_bias_for_charged_text() {
    let text = "This wonderful plan is a brilliant victory and a great success for the city.";
    let without = analyze(text);
    let with = Analyzer::new()
        .with_sentiment(Box::new(WordListSentiment))
        .analyze(text);

    assert!(without.sentiment.is_none());
    let report = with.sentiment.as_ref().expect("scorer report attached");
    assert!(report.score > 2.0, "strongly positive text, got {}", report.score);
    assert!(
        with.score < without.score,
        "sentiment rules should add bias: {} vs {}",
        with.score,
        without.score
    );
    assert!(
        with.reasons
            .iter()
            .any(|r| r.contains("indicates positive sentiment")),
        "sentiment reason missing, got {:?}",
        with.reasons
    );
}

#[test]
fn sentiment_negation_inverts_word_sign() {
    let scorer = WordListSentiment;
    use biaslens::SentimentScorer;
    let plain = scorer.analyze("The plan is a great success.");
    let negated = scorer.analyze("The plan is not a great success.");
    assert!(plain.score > 0.0);
    assert!(
        negated.score < plain.score,
        "negator should invert matched words: {} vs {}",
        plain.score,
        negated.score
    );
}

// ---------------------------------------------------------------------------
// Rating info
// ---------------------------------------------------------------------------

#[test]
fn rating_info_covers_all_tiers() {
    assert_eq!(get_rating_info("neutral").label, "Neutral");
    assert_eq!(get_rating_info("mostly neutral").label, "Mostly Neutral");
    assert_eq!(get_rating_info("not neutral").label, "Not Neutral");
}

#[test]
fn rating_info_falls_back_to_most_neutral_tier() {
    let fallback = get_rating_info("definitely not a rating");
    assert_eq!(fallback.label, get_rating_info("neutral").label);
    assert_eq!(fallback.color, get_rating_info("neutral").color);
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

#[test]
fn highlight_partition_is_lossless() {
    for text in PROPOSALS.iter().chain([LOADED_TEXT, NEUTRAL_TEXT].iter()) {
        let spans = highlight(text);
        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(&rebuilt, text, "span concatenation must reproduce the input");
        assert!(
            spans.iter().all(|s| !s.text.is_empty()),
            "no span may be empty for {text:?}"
        );
    }
}

#[test]
fn highlight_tags_loaded_terms() {
    let spans = highlight(LOADED_TEXT);
    assert_eq!(spans[0].kind, SpanKind::Positive);
    assert_eq!(spans[0].text, "Fast track", "original casing must be preserved");

    let proposal_two = highlight(PROPOSALS[1]);
    assert!(
        proposal_two.iter().any(|s| s.kind == SpanKind::Positive),
        "proposal 2 carries positive loaded terms"
    );
    assert!(
        proposal_two.iter().any(|s| s.kind == SpanKind::Negative),
        "proposal 2 carries negative loaded terms"
    );
}

#[test]
fn highlight_plain_text_is_one_normal_span() {
    let text = "The committee met on Tuesday and adjourned at four.";
    let spans = highlight(text);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, SpanKind::Normal);
    assert_eq!(spans[0].text, text);
}

#[test]
fn highlight_empty_input_wraps_it_unchanged() {
    let spans = highlight("");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, SpanKind::Normal);
    assert_eq!(spans[0].text, "");
}

// ---------------------------------------------------------------------------
// Rewriter
// ---------------------------------------------------------------------------

#[test]
fn rewrite_replaces_loaded_phrasing() {
    let out = rewrite(LOADED_TEXT);
    assert!(
        out.starts_with("Expedite the review process for"),
        "capitalized phrase replacement expected, got {out:?}"
    );
    assert!(
        !out.to_lowercase().contains("fast track"),
        "loaded phrase should be gone, got {out:?}"
    );
    assert!(
        !out.to_lowercase().contains("significantly"),
        "intensifier should be dropped, got {out:?}"
    );
    assert!(out.contains("reducing review time"), "got {out:?}");
}

#[test]
fn rewrite_output_is_nonempty_and_capitalized() {
    for text in PROPOSALS.iter().chain([LOADED_TEXT].iter()) {
        let out = rewrite(text);
        assert!(!out.is_empty(), "non-empty input must rewrite non-empty");
        let first = out.chars().next().unwrap();
        assert!(
            !first.is_lowercase(),
            "first character must be uppercased, got {out:?}"
        );
    }
}

#[test]
fn rewrite_keeps_input_when_replacements_delete_everything() {
    // Every word here maps to an empty replacement.
    let out = rewrite("great excellent now");
    assert!(!out.is_empty());
}

#[test]
fn rewrite_empty_input_is_unchanged() {
    assert_eq!(rewrite(""), "");
}

#[test]
fn second_rewrite_pass_does_not_regress_neutrality() {
    for text in PROPOSALS.iter().chain([LOADED_TEXT].iter()) {
        let once = rewrite(text);
        let twice = rewrite(&once);
        let once_score = analyze(&once).score;
        let twice_score = analyze(&twice).score;
        assert!(
            twice_score >= once_score,
            "second pass regressed {text:?}: {once_score} -> {twice_score}"
        );
    }
}

#[test]
fn rewrite_collapses_stacked_connectives() {
    // "must" and "should" both map to "would", leaving "would would".
    let out = rewrite("The council must should act.");
    assert!(
        !out.to_lowercase().contains("would would"),
        "duplicate connectives must collapse, got {out:?}"
    );
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn json_output_is_valid() {
    let result = Analyzer::new()
        .with_sentiment(Box::new(WordListSentiment))
        .extended(true)
        .analyze(PROPOSALS[1]);
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("score").is_some());
    assert_eq!(parsed["rating"], "not neutral");
    assert!(parsed.get("reasons").is_some());
    assert!(parsed.get("bias_score").is_some());
    assert!(parsed.get("sentiment").is_some());
    assert!(parsed.get("has_npov_violations").is_some());

    let spans = highlight(PROPOSALS[1]);
    let json = serde_json::to_string(&spans).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["type"], "positive");
}
