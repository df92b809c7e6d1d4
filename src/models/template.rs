use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    Email,
    Whatsapp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub content: String,
    pub subject: Option<String>,
}

pub const TERMINATION_TEMPLATE: &str = "Termination";

/// Message templates every fresh installation starts with.
pub fn default_templates() -> Vec<Template> {
    let email = |name: &str, subject: &str, content: &str| Template {
        id: Uuid::new_v4(),
        name: name.to_string(),
        template_type: TemplateType::Email,
        content: content.to_string(),
        subject: Some(subject.to_string()),
    };

    vec![
        email(
            "Interview Invitation",
            "Invitation to Video Interview for Trade Plate Driver Position",
            "Hi {candidateName},\n\nThank you for your interest in the Trade Plate Driver position.\n\nWe were impressed with your application and would like to invite you for a video interview to discuss your experience further.\n\nPlease let us know what times work best for you in the coming days.\n\nBest regards,\nRecruitment Team",
        ),
        email(
            "Re-engagement Follow-up",
            "Following Up: Trade Plate Driver Opportunities",
            "Hi {candidateName},\n\nHope you're doing well.\n\nWe spoke a few months ago about a Trade Plate Driver position. I wanted to reach out again to see if you might be open to new opportunities, as we have some new openings.\n\nWould you be available for a brief chat sometime soon to catch up?\n\nBest regards,\nRecruitment Team",
        ),
        email(
            "Rejection Post-Interview",
            "Update on Your Application for Trade Plate Driver",
            "Hi {candidateName},\n\nThank you for taking the time to interview with us for the Trade Plate Driver position.\n\nWhile we were impressed with your qualifications, we have decided to move forward with another candidate whose experience is a closer match for this role.\n\nWe appreciate your interest and wish you the best of luck in your job search.\n\nBest regards,\nRecruitment Team",
        ),
        email(
            "Induction Invitation",
            "Induction Invitation: Trade Plate Driver",
            "Hi {candidateName},\n\nWe are delighted to invite you to our induction day for the Trade Plate Driver position!\n\nFurther details about the induction are attached. Please let us know if you have any questions.\n\nBest regards,\nRecruitment Team",
        ),
        email(
            TERMINATION_TEMPLATE,
            "Private and Confidential: Termination of Driver Supplier Statement for {candidateName}",
            "Private and Confidential\n\nDear {candidateName},\n\nThis email serves as formal written notification regarding the termination of your Driver Supplier Statement.\n\nYour Driver Supplier Statement is terminated with effect from {currentDate}.\n\nReason: {terminationReason}\n\nPlease return all issued kit within 7 days.\n\nRecruitment Team",
        ),
    ]
}
