use tg_models::ResearchCategory;

/// `(question_key, question)` pairs asked for one category, in order.
pub fn questions(category: ResearchCategory) -> &'static [(&'static str, &'static str)] {
  match category {
    ResearchCategory::BasicInfo => &[
      ("mission_statement", "What is the subnet's mission statement or primary goal?"),
      ("problem_solving", "What specific problem does this subnet aim to solve?"),
      ("target_audience", "Who is the target audience or user base for this subnet?"),
      ("unique_value_proposition", "What makes this subnet unique compared to competitors?"),
    ],
    ResearchCategory::Team => &[
      ("team_size", "How many team members does this subnet have?"),
      ("team_experience", "What is the experience level and background of the team?"),
      ("leadership_quality", "Who are the key leaders and what are their credentials?"),
      ("team_transparency", "How transparent is the team about their identities and backgrounds?"),
    ],
    ResearchCategory::Product => &[
      (
        "product_status",
        "What is the current status of their product/service (concept, MVP, beta, live)?",
      ),
      ("technical_approach", "What technical approach or methodology do they use?"),
      ("product_differentiation", "How does their product differ from existing solutions?"),
      ("scalability", "How scalable is their technical solution?"),
    ],
    ResearchCategory::Business => &[
      ("revenue_model", "What is their revenue model or monetization strategy?"),
      ("market_size", "What is the size of their target market?"),
      ("competitive_landscape", "Who are their main competitors?"),
      ("partnership_strategy", "Do they have notable partnerships or collaborations?"),
    ],
    ResearchCategory::Development => &[
      ("development_activity", "How active is their development (based on GitHub, updates, etc.)?"),
      ("roadmap_clarity", "How clear and detailed is their development roadmap?"),
      ("milestone_achievement", "Have they achieved their stated milestones?"),
      ("community_engagement", "How engaged is their community?"),
    ],
    ResearchCategory::Risks => &[
      ("technical_risks", "What are the main technical risks or challenges?"),
      ("market_risks", "What market risks does the subnet face?"),
      ("regulatory_risks", "Are there any regulatory or compliance concerns?"),
      ("team_risks", "Are there any team-related risks (key person dependency, etc.)?"),
    ],
  }
}

/// Number of questions across every category.
pub fn total_questions() -> usize {
  ResearchCategory::ALL.iter().map(|c| questions(*c).len()).sum()
}
