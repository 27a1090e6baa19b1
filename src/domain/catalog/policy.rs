//! Policy and guidelines text consumed by the policy agent.
//!
//! Pure configuration. The refund window enforced by operations is 30 days;
//! the text below must stay consistent with that rule.

/// Community behavior guidelines.
pub const COMMUNITY_GUIDELINES: &str = "\
Community Guidelines:
1. Promotions
   - No self-promotion or advertising
   - Focus on learning and growing together
   - Share your work only in designated channels

2. Content Quality
   - Provide detailed, helpful responses
   - Include code examples when relevant
   - Use proper formatting for code snippets

3. Behavior
   - Be respectful and professional
   - No politics or religion discussions
   - Help maintain a positive learning environment";

/// Course purchase, access, and usage policies.
pub const COURSE_POLICIES: &str = "\
Course Policies:
1. Refund Policy
   - 30-day money-back guarantee on all courses.
   - To get a refund, contact the orders agent.

2. Course Access
   - Lifetime access to all purchased course content.
   - Specific support inclusions (like coaching calls or templates) vary by
     course. Refer to the course catalog for details.

3. Code Usage
   - You can use course code in your personal and commercial projects.
   - Credit is not required but is appreciated.
   - No reselling of course materials.";

/// Privacy commitments.
pub const PRIVACY_POLICY: &str = "\
Privacy Policy:
- We respect your privacy.
- Your data is never sold.
- Course progress is tracked for support purposes.";
