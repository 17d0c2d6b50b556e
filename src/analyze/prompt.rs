//! Prompt sent to the completion service: the extracted post plus a fixed rubric.

use crate::extract::SourcePost;

const PREAMBLE: &str = "You are a football transfer reliability analyzer. Analyze this tweet and respond with ONLY a valid JSON object in the exact format shown below.";

const RUBRIC: &str = r#"JOURNALIST TIERS:
- Tier 1 (Base Score 85-100): Fabrizio Romano, David Ornstein, Gianluca Di Marzio, James Pearce, Paul Joyce, Ben Jacobs, Matteo Moretto
- Tier 2 (Base Score 65-85): Reliable club journalists, Sky Sports News, BBC Sport, The Athletic reporters
- Tier 3 (Base Score 45-65): Decent sources with mixed records, regional newspapers
- Tier 4 (Base Score 25-45): Aggregators, questionable sources, fan accounts
- Tier 5 (Base Score 0-25): Unreliable, fake accounts, clickbait

LANGUAGE INDICATORS:
- "HERE WE GO", "DONE DEAL", "CONFIRMED", "OFFICIAL" = +10-15 points
- Specific details (fees, contract length, medical dates) = +5-10 points
- "Could", "might", "interested", "monitoring" = -5-10 points

CITATION ANALYSIS (VERY IMPORTANT):
Look for these patterns and apply score bonuses:

OFFICIAL SOURCES (+20-30 points):
- "@clubname official", "club confirms", "official announcement"
- Verified club accounts, player accounts, agent accounts
- Official websites, press conferences

TIER 1 CITATIONS (+15-25 points):
- "according to @FabrizioRomano", "reports @David_Ornstein"
- "via Romano", "per Di Marzio", "Sky Sports reports"
- Any mention of Tier 1 journalists as sources

TIER 2 CITATIONS (+10-15 points):
- "BBC reports", "The Athletic says", "Sky Sports News"
- Local reliable journalists, club journalists

NEWS OUTLET CITATIONS (+5-15 points):
- "ESPN reports", "Goal.com", "Transfer Guru", major sports outlets

CITATION VERIFICATION NOTES:
- If citing sources, add verification reminder in reasoning
- Distinguish between first-hand reporting vs. citing others
- Note if original source should be checked

SCORING FORMULA:
Final Score = Base Score (author tier) + Language Bonus + Citation Bonus + Context Factors

CONTEXT FACTORS:
- Transfer window timing (+/- 5 points)
- Logical fit for club/player (+/- 5 points)
- Contradicts reliable sources (-10 points)

Respond with ONLY this JSON format (no other text):

{
  "journalist_tier": "Tier X",
  "language_confidence": "High/Medium/Low",
  "source_quality": "Excellent/Good/Fair/Poor",
  "reliability_score": 95,
  "citation_bonus": 15,
  "citations_found": ["@FabrizioRomano", "Club Official"],
  "reasoning": "Detailed explanation including: 1) Author credibility, 2) Language analysis, 3) Citation analysis with verification notes, 4) Final assessment"
}"#;

pub fn build_prompt(post: &SourcePost) -> String {
    let mut out = String::with_capacity(PREAMBLE.len() + RUBRIC.len() + post.text.len() + 64);
    out.push_str(PREAMBLE);
    out.push_str("\n\nTweet: \"");
    out.push_str(&post.text);
    out.push_str("\"\nAuthor: \"");
    out.push_str(&post.author);
    out.push_str("\"\n\n");
    out.push_str(RUBRIC);
    out
}
