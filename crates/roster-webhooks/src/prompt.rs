//! Generation prompt template and its placeholder substitution.
//!
//! The webhook does its own substitution; rendering here is for previews in
//! the team editor.

use roster_core::MonthRef;

/// Built-in prompt used when a team has no custom one.
pub const DEFAULT_PROMPT: &str = r#"You are a Roster Manager. Generate a JSON schedule for the '{{TEAM_NAME}}' team for {{MONTH_NAME}} {{YEAR}}.

### INPUT DATA
**Team List:** {{TEAM_MEMBERS}}
**Slack Requests:** """{{SLACK_REQUESTS}}"""

### RULES (Strict Logic)
1. **Mapping:** Fuzzy match names from Slack to the Team List. 
   - "Sheesh" -> "Ashish"
   - "Bala" -> "Jetty Bala" (if in list)
2. **Codes:** - PL (Planned Leave)
   - OH (Optional Holiday)
   - WO (Week Off)
3. **Weekend Rules (Sat/Sun):** - REQUIRES exactly 3 people working per day.
   - Shifts: Two people on "10:00 - 19:00", One person on "18:00 - 03:00".
   - The *same* 3 people must work both Saturday and Sunday of that specific weekend.
   - These 3 people MUST get 2 compensatory WOs (one in the week before, one in the week after).
4. **Weekday Rules (Mon-Fri):**
   - **CONSISTENCY RULE:** Each person must be assigned ONE primary shift type (either "09:00 - 18:00" or "11:00 - 20:00") for the entire month, UNLESS they are on the Night Shift rotation. Do not switch shifts between days for the same person unless explicitly requested.
   - **Team Split:** Assign approximately 50% of the team to the Morning shift ("09:00 - 18:00") and 50% to the Afternoon shift ("11:00 - 20:00").
   - Maximize availability: Ensure WOs are spread out; do not give everyone WO on the same day.
5. **Night Shift Rule ("18:00 - 03:00"):**
   - **Requirement:** Assign exactly ONE person to the Night Shift for the first 2 weeks (Days 1-14).
   - **Rotation:** Assign a DIFFERENT person to the Night Shift for the remainder of the month (Days 15-End).
   - **EXCLUSIONS:** The following people CANNOT do night shift: Aswin A, Ashish, Manoj, Panthi Kishorbhai Patel, Ayush S, Raj Vardhan, Shehjaar Manwati.
6. **Timeline:** Generate roster from {{START_DATE}} to {{END_DATE}}.

### OUTPUT FORMAT (JSON ONLY)
Return a flat array of objects. Do not use Markdown, do not include comments.
[
    { "Date": "{{YEAR}}-{{MONTH_PADDED}}-01", "Name": "Ayush S", "Status": "09:00 - 18:00" },
    { "Date": "{{YEAR}}-{{MONTH_PADDED}}-01", "Name": "Manoj", "Status": "PL" },
    ...
]"#;

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub team_name: &'a str,
    pub members: &'a [String],
    pub month: MonthRef,
    pub slack_requests: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn default_template() -> Self {
        Self::new(DEFAULT_PROMPT)
    }

    /// The team's own prompt when set, otherwise the built-in one.
    pub fn for_team(custom_prompt: Option<&str>) -> Self {
        match custom_prompt.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Self::new(p),
            None => Self::default_template(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Replace every known placeholder. Unknown `{{...}}` tokens are kept.
    pub fn render(&self, ctx: &PromptContext<'_>) -> String {
        let year = ctx.month.year.to_string();
        let pairs: [(&str, String); 8] = [
            ("{{TEAM_NAME}}", ctx.team_name.to_string()),
            ("{{MONTH_NAME}}", ctx.month.name().to_string()),
            ("{{YEAR}}", year),
            ("{{TEAM_MEMBERS}}", ctx.members.join(", ")),
            ("{{SLACK_REQUESTS}}", ctx.slack_requests.to_string()),
            ("{{START_DATE}}", ctx.month.first_day().to_string()),
            ("{{END_DATE}}", ctx.month.last_day().to_string()),
            ("{{MONTH_PADDED}}", ctx.month.padded()),
        ];
        pairs
            .iter()
            .fold(self.text.clone(), |acc, (key, value)| acc.replace(key, value))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::default_template()
    }
}
