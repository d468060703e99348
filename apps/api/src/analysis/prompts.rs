// LLM prompt constants for the analysis module.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const ANALYSIS_ROLE: &str = "You are an expert ATS (Applicant Tracking System) resume analyzer.";

/// System prompt for ATS analysis: the analyzer role plus the JSON-only rules.
pub fn analysis_system_prompt() -> String {
    format!("{ANALYSIS_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Analysis prompt template. Replace `{resume_text}` and `{job_description}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compare the resume text against the job description and provide a detailed ATS analysis.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "matchScore": 72,
  "matchedKeywords": [
    {"keyword": "React", "count": 3}
  ],
  "missingKeywords": [
    "Kubernetes"
  ],
  "suggestions": [
    {
      "id": "s1",
      "type": "replace",
      "keyword": "Kubernetes",
      "location": "Work Experience - Backend Engineer",
      "originalText": "Deployed services to production",
      "suggestedText": "Deployed containerized services to production on Kubernetes",
      "reason": "Kubernetes is a required skill in the job description",
      "impact": "high",
      "category": "experience"
    }
  ],
  "contextualInsights": {
    "resumeStrengths": ["Strong frontend experience"],
    "improvementAreas": ["Cloud infrastructure keywords"],
    "overallTone": "technical",
    "experienceLevel": "mid"
  }
}

Rules for analysis:

MATCH SCORE: integer 0-100, based on keyword overlap, skill alignment and experience relevance.
MATCHED KEYWORDS: skills, technologies and important terms present in BOTH documents, with the number of times each appears in the resume. Most frequent first.
MISSING KEYWORDS: crucial terms from the job description that the resume lacks.

SUGGESTIONS: 5-8 specific, actionable recommendations.
- "type" is exactly one of: "replace" (improve existing text with better keywords), "add" (add missing but relevant information), "enhance" (expand an existing point with more detail)
- "originalText" MUST quote the EXACT text from the resume to be modified, character for character. For "add" it may be empty.
- "suggestedText" is the improved version. Stay faithful to the candidate's actual experience. Never invent employers, titles, dates or metrics.
- "reason" explains the ATS impact.
- "impact" is exactly one of: "high", "medium", "low"
- "category" is exactly one of: "skills", "experience", "keywords", "formatting"
- "id" is unique within the response.

FOCUS AREAS:
- Exact phrase matching from the job description
- Industry-specific terminology alignment
- Action verbs that match job requirements
- Quantifiable achievements relevant to the role
- Technical skills and soft-skill phrasing used in the job posting"#;

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    // Job description first: a resume containing the literal placeholder must not be expanded.
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replacen("{resume_text}", resume_text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts() {
        let prompt = build_analysis_prompt("RESUME BODY", "JOB BODY");
        assert!(prompt.contains("RESUME TEXT:\nRESUME BODY"));
        assert!(prompt.contains("JOB DESCRIPTION:\nJOB BODY"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_system_prompt_demands_json() {
        let system = analysis_system_prompt();
        assert!(system.starts_with("You are an expert ATS"));
        assert!(system.contains("single valid JSON object only"));
    }

    #[test]
    fn test_prompt_names_every_result_field() {
        for field in [
            "matchScore",
            "matchedKeywords",
            "missingKeywords",
            "suggestions",
            "contextualInsights",
            "originalText",
            "suggestedText",
        ] {
            assert!(ANALYSIS_PROMPT_TEMPLATE.contains(field), "missing {field}");
        }
    }
}
