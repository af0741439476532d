use tg_models::{ResearchCategory, ScoreCategory};

/// What a scoring category measures and which research feeds it.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
  pub description: &'static str,
  pub criteria: [&'static str; 5],
  pub research: &'static [ResearchCategory],
}

pub fn category_spec(category: ScoreCategory) -> CategorySpec {
  match category {
    ScoreCategory::TeamStrength => CategorySpec {
      description: "Team quality, experience, and transparency",
      criteria: [
        "Team size and completeness",
        "Leadership experience and credentials",
        "Team transparency and public profiles",
        "Track record of execution",
        "Technical expertise alignment",
      ],
      research: &[ResearchCategory::Team, ResearchCategory::BasicInfo],
    },
    ScoreCategory::ProductViability => CategorySpec {
      description: "Product development status and technical feasibility",
      criteria: [
        "Product development stage (concept to live)",
        "Technical approach and innovation",
        "Product differentiation and uniqueness",
        "Scalability and technical architecture",
        "User adoption evidence",
      ],
      research: &[ResearchCategory::Product, ResearchCategory::BasicInfo, ResearchCategory::Development],
    },
    ScoreCategory::MarketOpportunity => CategorySpec {
      description: "Market size, demand, and competitive positioning",
      criteria: [
        "Target market size and growth potential",
        "Market demand validation",
        "Competitive landscape and positioning",
        "Business model viability",
        "Revenue potential and monetization",
      ],
      research: &[ResearchCategory::Business, ResearchCategory::BasicInfo],
    },
    ScoreCategory::ExecutionProgress => CategorySpec {
      description: "Development activity and milestone achievement",
      criteria: [
        "Development activity and commits",
        "Roadmap clarity and achievement",
        "Community engagement and growth",
        "Partnership development",
        "Consistent progress demonstration",
      ],
      research: &[ResearchCategory::Development, ResearchCategory::Team],
    },
    ScoreCategory::RiskManagement => CategorySpec {
      description: "Risk assessment and mitigation strategies",
      criteria: [
        "Technical risk identification and mitigation",
        "Market and competitive risks",
        "Regulatory and compliance considerations",
        "Team and operational risks",
        "Financial sustainability",
      ],
      research: &[ResearchCategory::Risks, ResearchCategory::Team, ResearchCategory::Business],
    },
  }
}
