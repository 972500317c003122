// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Three-stage outreach template library.
//!
//! Stage 0 is the initial cold email, stages 1 and 2 are follow-ups; any
//! higher stage is terminal and has no template. Placeholders use
//! `{name}`-style tokens filled from the lead row and configuration.

const INITIAL: &str = "\
<html>
<body>
<p>Hi {name},</p>
<p>I noticed {company} is doing great work in {industry}.
I wanted to reach out because we help companies like yours {value_prop}.</p>
<p>Would you be open to a quick 15-minute call this week?</p>
<p>Best regards,<br>{sender_name}</p>
</body>
</html>
";

const FOLLOWUP_1: &str = "\
<html>
<body>
<p>Hi {name},</p>
<p>Just following up on my previous email. I understand you're busy,
but I thought you might be interested in how we've helped {case_study_company}
achieve {case_study_result}.</p>
<p>Would love to chat if you have 10 minutes.</p>
<p>Best regards,<br>{sender_name}</p>
</body>
</html>
";

const FOLLOWUP_2: &str = "\
<html>
<body>
<p>Hi {name},</p>
<p>Last follow-up! I don't want to be a pest, but wanted to share
one quick resource that might be helpful: {resource_link}</p>
<p>If now's not the right time, no worries at all.</p>
<p>Cheers,<br>{sender_name}</p>
</body>
</html>
";

/// Values slotted into a template body.
///
/// `name`, `company`, and `industry` come from the lead row; the rest come
/// from configuration.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub company: &'a str,
    pub industry: &'a str,
    pub value_prop: &'a str,
    pub case_study_company: &'a str,
    pub case_study_result: &'a str,
    pub resource_link: &'a str,
    pub sender_name: &'a str,
}

/// One of the three outreach stages that has an email template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    Initial,
    FollowUp1,
    FollowUp2,
}

impl EmailTemplate {
    /// Template for a lead's current stage, or `None` for terminal stages.
    pub fn for_stage(stage: u32) -> Option<Self> {
        match stage {
            0 => Some(Self::Initial),
            1 => Some(Self::FollowUp1),
            2 => Some(Self::FollowUp2),
            _ => None,
        }
    }

    /// Subject line for this stage.
    pub fn subject(&self, company: &str) -> String {
        match self {
            Self::Initial => format!("Quick question about {company}"),
            Self::FollowUp1 | Self::FollowUp2 => format!("Re: Quick question about {company}"),
        }
    }

    /// HTML body with every placeholder filled.
    pub fn body(&self, vars: &TemplateVars<'_>) -> String {
        let template = match self {
            Self::Initial => INITIAL,
            Self::FollowUp1 => FOLLOWUP_1,
            Self::FollowUp2 => FOLLOWUP_2,
        };
        template
            .replace("{name}", vars.name)
            .replace("{company}", vars.company)
            .replace("{industry}", vars.industry)
            .replace("{value_prop}", vars.value_prop)
            .replace("{case_study_company}", vars.case_study_company)
            .replace("{case_study_result}", vars.case_study_result)
            .replace("{resource_link}", vars.resource_link)
            .replace("{sender_name}", vars.sender_name)
    }
}
