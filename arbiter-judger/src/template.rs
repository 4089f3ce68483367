use arbiter_protocol::common::CodeTemplate;

/// Token in a template's postcode that is replaced with the staged file's
/// stem for class-name-bound languages, whose compilers require the public
/// type name to match the file name.
pub const FILE_STEM_TOKEN: &str = "{{FILENAME}}";

/// Merges the submitted code with the question's boilerplate. `bind_stem`
/// is the staged file's stem for class-name-bound languages, `None` for
/// everything else.
pub fn render(tpl: &CodeTemplate, code: &str, bind_stem: Option<&str>) -> String {
    let postcode = match bind_stem {
        Some(stem) => tpl.postcode.replace(FILE_STEM_TOKEN, stem),
        None => tpl.postcode.clone(),
    };
    format!("{}\n{}\n{}", tpl.precode, code, postcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tpl(precode: &str, postcode: &str) -> CodeTemplate {
        CodeTemplate {
            precode: precode.to_owned(),
            template: String::new(),
            postcode: postcode.to_owned(),
        }
    }

    #[test]
    fn joins_precode_code_postcode() {
        let rendered = render(&tpl("head", "tail"), "body", None);
        assert_eq!(rendered, "head\nbody\ntail");
    }

    #[test]
    fn binds_file_stem_into_postcode() {
        let rendered = render(
            &tpl("import java.util.Scanner;", "class {{FILENAME}} {}"),
            "// solution",
            Some("Main42"),
        );
        assert!(rendered.ends_with("class Main42 {}"));
        assert!(!rendered.contains(FILE_STEM_TOKEN));
    }

    #[test]
    fn token_is_left_alone_without_binding() {
        let rendered = render(&tpl("", "class {{FILENAME}} {}"), "x", None);
        assert!(rendered.contains(FILE_STEM_TOKEN));
    }
}
