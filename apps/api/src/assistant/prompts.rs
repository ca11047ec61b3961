// Assistant prompt templates.
// Every template is pure data with two named insertion points; `fill` does the substitution.

use serde::Serialize;

pub const JOB_POSTING_PLACEHOLDER: &str = "{job_posting}";
pub const RESUME_TEXT_PLACEHOLDER: &str = "{resume_text}";

/// System prompt shared by every assistant task.
pub const ASSISTANT_SYSTEM: &str = "\
You are a professional career assistant specialising in the analysis of job postings and résumés. \
Base every statement on the job posting and résumé you are given. \
Do NOT invent employers, dates, degrees or metrics that the résumé does not contain.";

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyse how well the candidate's résumé matches the job posting below.

JOB POSTING:
{job_posting}

RÉSUMÉ:
{resume_text}

Respond in Markdown with these sections:
1. **Match summary**: two or three sentences on overall fit.
2. **Key requirements**: the most important requirements of the posting, each marked as met, partially met or missing, with the résumé evidence.
3. **Keywords to add**: skills and terms from the posting that the résumé lacks but could honestly include.
4. **Suggested edits**: concrete rewrites of résumé bullets or sections that would make the match clearer.
5. **Optimised summary**: a short professional summary tailored to this posting."#;

pub const COVER_LETTER_PROMPT: &str = r#"Write a cover letter for the job posting below, using only facts from the candidate's résumé.

JOB POSTING:
{job_posting}

RÉSUMÉ:
{resume_text}

Requirements for the letter:
- Three to four paragraphs, under 400 words.
- Open with the specific role and why the candidate is interested.
- Connect two or three concrete achievements from the résumé to the posting's main requirements.
- Professional but warm tone; no clichés such as "I am writing to apply".
- Close with a call to action. Leave placeholders like [Hiring Manager] where names are unknown."#;

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"Help the candidate prepare for an interview for the job posting below.

JOB POSTING:
{job_posting}

RÉSUMÉ:
{resume_text}

Produce, in Markdown:
1. Ten likely interview questions: a mix of technical questions drawn from the posting's requirements and behavioural questions drawn from the candidate's experience.
2. For each question, a short note on what the interviewer is probing and an outline of a strong answer based on the résumé (use the STAR structure for behavioural questions).
3. Three thoughtful questions the candidate could ask the interviewer about this role."#;

pub const STRENGTHS_PROMPT: &str = r#"Identify the candidate's strongest selling points for the job posting below.

JOB POSTING:
{job_posting}

RÉSUMÉ:
{resume_text}

Respond in Markdown with:
1. **Top strengths**: the five strengths most relevant to this role, each with the résumé evidence that supports it.
2. **Unique value**: what sets this candidate apart from a typical applicant for this posting.
3. **Gaps to address**: up to three weaknesses relative to the posting and how to frame or mitigate each one honestly."#;

/// The assistant tasks a user can run against a job posting and résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptTemplate {
    ResumeAnalysis,
    CoverLetter,
    InterviewQuestions,
    Strengths,
}

/// Values for the template's named insertion points.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub job_posting: &'a str,
    pub resume_text: &'a str,
}

impl PromptTemplate {
    pub const ALL: [PromptTemplate; 4] = [
        PromptTemplate::ResumeAnalysis,
        PromptTemplate::CoverLetter,
        PromptTemplate::InterviewQuestions,
        PromptTemplate::Strengths,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::ResumeAnalysis => "resume-analysis",
            Self::CoverLetter => "cover-letter",
            Self::InterviewQuestions => "interview-questions",
            Self::Strengths => "strengths",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ResumeAnalysis => "Résumé analysis",
            Self::CoverLetter => "Cover letter",
            Self::InterviewQuestions => "Interview preparation",
            Self::Strengths => "Strengths",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ResumeAnalysis => {
                "Compares the résumé against the posting and suggests concrete edits."
            }
            Self::CoverLetter => "Drafts a cover letter grounded in the résumé.",
            Self::InterviewQuestions => {
                "Predicts interview questions and outlines answers from the résumé."
            }
            Self::Strengths => "Highlights the candidate's strongest points for this role.",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::ResumeAnalysis => RESUME_ANALYSIS_PROMPT,
            Self::CoverLetter => COVER_LETTER_PROMPT,
            Self::InterviewQuestions => INTERVIEW_QUESTIONS_PROMPT,
            Self::Strengths => STRENGTHS_PROMPT,
        }
    }

    /// Substitutes the named placeholders in one pass over the template, so
    /// placeholder syntax inside user text is copied through literally.
    pub fn fill(self, inputs: &PromptInputs<'_>) -> String {
        let template = self.template();
        let mut out = String::with_capacity(
            template.len() + inputs.job_posting.len() + inputs.resume_text.len(),
        );
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            if candidate.starts_with(JOB_POSTING_PLACEHOLDER) {
                out.push_str(inputs.job_posting);
                rest = &candidate[JOB_POSTING_PLACEHOLDER.len()..];
            } else if candidate.starts_with(RESUME_TEXT_PLACEHOLDER) {
                out.push_str(inputs.resume_text);
                rest = &candidate[RESUME_TEXT_PLACEHOLDER.len()..];
            } else {
                out.push('{');
                rest = &candidate[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: PromptInputs<'static> = PromptInputs {
        job_posting: "Senior Rust Engineer. Required: 5+ years Rust.",
        resume_text: "Name: Bob\nSkills: Go, Rust\n",
    };

    #[test]
    fn test_every_template_has_both_placeholders_once() {
        for template in PromptTemplate::ALL {
            let text = template.template();
            assert_eq!(text.matches(JOB_POSTING_PLACEHOLDER).count(), 1, "{template:?}");
            assert_eq!(text.matches(RESUME_TEXT_PLACEHOLDER).count(), 1, "{template:?}");
        }
    }

    #[test]
    fn test_fill_embeds_both_texts() {
        for template in PromptTemplate::ALL {
            let prompt = template.fill(&INPUTS);
            assert!(prompt.contains(INPUTS.job_posting));
            assert!(prompt.contains(INPUTS.resume_text));
            assert!(!prompt.contains(JOB_POSTING_PLACEHOLDER));
            assert!(!prompt.contains(RESUME_TEXT_PLACEHOLDER));
        }
    }

    #[test]
    fn test_fill_does_not_expand_placeholders_in_user_text() {
        let inputs = PromptInputs {
            job_posting: "Mention {resume_text} verbatim",
            resume_text: "uses {braces} and {job_posting}",
        };
        let prompt = PromptTemplate::Strengths.fill(&inputs);
        assert!(prompt.contains("Mention {resume_text} verbatim"));
        assert!(prompt.contains("uses {braces} and {job_posting}"));
    }

    #[test]
    fn test_fill_keeps_job_posting_before_resume() {
        let prompt = PromptTemplate::CoverLetter.fill(&INPUTS);
        let job = prompt.find(INPUTS.job_posting).unwrap();
        let resume = prompt.find(INPUTS.resume_text).unwrap();
        assert!(job < resume);
    }

    #[test]
    fn test_slug_round_trip() {
        for template in PromptTemplate::ALL {
            assert_eq!(PromptTemplate::from_slug(template.slug()), Some(template));
        }
        assert_eq!(PromptTemplate::from_slug("salary-negotiation"), None);
    }

    #[test]
    fn test_serializes_as_slug() {
        let json = serde_json::to_string(&PromptTemplate::InterviewQuestions).unwrap();
        assert_eq!(json, r#""interview-questions""#);
    }
}
