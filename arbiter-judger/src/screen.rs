use crate::config::Config;
use crate::lang::Language;

/// Lexical tripwire for dangerous standard-library usage: returns the first
/// denied import the code pulls in, if any. Pattern matching only; real
/// isolation belongs to the host running the subprocesses.
pub fn find_risky_import(lang: &dyn Language, code: &str, config: &Config) -> Option<String> {
    let mut denylist: Vec<&str> = lang.risky_imports().to_vec();
    if let Some(extra) = config.screen.extra_imports.get(lang.tag()) {
        denylist.extend(extra.iter().map(|s| s.as_str()));
    }
    lang.find_risky_import(code, &denylist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang;

    fn scan(tag: &str, code: &str) -> Option<String> {
        find_risky_import(lang::from_tag(tag).unwrap(), code, &Config::default())
    }

    #[test]
    fn python_import_forms() {
        assert_eq!(scan("py", "import os"), Some("os".to_owned()));
        assert_eq!(scan("py", "import os.path as p"), Some("os".to_owned()));
        assert_eq!(scan("py", "from subprocess import run"), Some("subprocess".to_owned()));
        assert_eq!(scan("py", "import math, socket"), Some("socket".to_owned()));
        assert_eq!(scan("py", "import math\nprint(math.pi)"), None);
        // prefixes must respect module boundaries
        assert_eq!(scan("py", "import ossuary"), None);
    }

    #[test]
    fn javascript_import_and_require_forms() {
        assert_eq!(scan("js", "const fs = require('fs');"), Some("fs".to_owned()));
        assert_eq!(scan("js", "import cp from 'child_process';"), Some("child_process".to_owned()));
        assert_eq!(scan("js", "import 'node:net';"), Some("net".to_owned()));
        assert_eq!(scan("js", "const fsp = require('fs/promises');"), Some("fs".to_owned()));
        assert_eq!(scan("js", "const rl = require('readline');"), None);
    }

    #[test]
    fn c_and_cpp_includes() {
        assert_eq!(scan("c", "#include <unistd.h>"), Some("unistd.h".to_owned()));
        assert_eq!(scan("c", "#include \"unistd.h\""), Some("unistd.h".to_owned()));
        assert_eq!(scan("c", "#include <stdio.h>\nint main(){}"), None);
        assert_eq!(scan("cpp", "#include <fstream>"), Some("fstream".to_owned()));
        assert_eq!(scan("cpp", "#include <iostream>"), None);
    }

    #[test]
    fn java_import_statements() {
        assert_eq!(
            scan("java", "import java.lang.Runtime;"),
            Some("java.lang.Runtime".to_owned())
        );
        assert_eq!(scan("java", "import java.util.Scanner;"), None);
    }

    #[test]
    fn go_import_blocks_and_single_imports() {
        let block = "package main\nimport (\n\t\"fmt\"\n\t\"os/exec\"\n)";
        assert_eq!(scan("go", block), Some("os/exec".to_owned()));
        assert_eq!(scan("go", "import \"net\""), Some("net".to_owned()));
        assert_eq!(scan("go", "import \"fmt\""), None);
    }

    #[test]
    fn config_extends_the_denylist() {
        let mut config = Config::default();
        config
            .screen
            .extra_imports
            .insert("py".to_owned(), vec!["turtle".to_owned()]);
        let lang = lang::from_tag("py").unwrap();
        assert_eq!(
            find_risky_import(lang, "import turtle", &config),
            Some("turtle".to_owned())
        );
    }
}
