#[cfg(test)]
use super::renumber::Renumberer;


#[cfg(test)]
fn test_renumber(test_code: &str,expected: &str,beg: usize,end: usize,first: usize,step: usize,should_fail: bool) {
	let mut renumberer = Renumberer::new();
	let result = renumberer.renumber(test_code, beg, end, first, step);
	match (should_fail,result) {
		(true,Ok(_actual)) => {
			// if renumbering should fail, but instead works, the test has failed
			assert!(false);
		},
		(true,Err(_)) => {},
		(false,Ok(actual)) => {
			assert_eq!(actual,String::from(expected)+"\n");
		},
		(false,Err(e)) => {
			panic!("renumber failed: {}",e);
		}
	}
}

#[cfg(test)]
fn test_move(test_code: &str,expected: &str,beg: usize,end: usize,first: usize,step: usize,should_fail: bool) {
	let mut renumberer = Renumberer::new();
	let result = renumberer.move_lines(test_code, beg, end, first, step);
	match (should_fail,result) {
		(true,Ok(_actual)) => {
			assert!(false);
		},
		(true,Err(_)) => {},
		(false,Ok(actual)) => {
			assert_eq!(actual,String::from(expected)+"\n");
		},
		(false,Err(e)) => {
			panic!("move failed: {}",e);
		}
	}
}

mod valid_cases {
    #[test]
	fn zero_start() {
		let test_code = "0 HOME\n20 PRINT X\n30 END";
		let expected = "100 HOME\n101 PRINT X\n102 END";
		super::test_renumber(test_code, expected,0,usize::MAX,100,1,false);
	}
    #[test]
	fn largest_num() {
		let test_code = "0 HOME\n20 PRINT X\n30 END";
		let expected = "63993 HOME\n63996 PRINT X\n63999 END";
		super::test_renumber(test_code, expected,0,usize::MAX,63993,3,false);
	}
    #[test]
	fn segment() {
		let test_code = "10 HOME\n20 INPUT X\n30 PRINT X\n40 END";
		let expected = "10 HOME\n27 INPUT X\n29 PRINT X\n40 END";
		super::test_renumber(test_code, expected,20,40,27,2,false);
	}
    #[test]
	fn updates_refs() {
		let test_code = "10 GOTO 30\n20 PRINT\n30 END";
		let expected = "10 GOTO 40\n20 PRINT\n40 END";
		super::test_renumber(test_code, expected,30,usize::MAX,40,1,false);
	}
}

mod invalid_cases {
    #[test]
	fn breaks_lower_bound() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_renumber(test_code, expected,20,usize::MAX,9,1,true);
	}
    #[test]
	fn breaks_upper_bound() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_renumber(test_code, expected,0,30,25,5,true);
	}
    #[test]
	fn breaks_max() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_renumber(test_code, expected,0,usize::MAX,63800,100,true);
	}
    #[test]
	fn zero_step() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_renumber(test_code, expected,0,usize::MAX,100,0,true);
	}
}

mod move_cases {
    #[test]
	fn block_with_refs() {
		let test_code = "10 GOTO 100\n20 END\n100 PRINT X\n110 GOTO 100";
		let expected = "10 GOTO 30\n20 END\n30 PRINT X\n40 GOTO 30";
		super::test_move(test_code, expected,100,usize::MAX,30,10,false);
	}
    #[test]
	fn start_collision() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_move(test_code, expected,30,usize::MAX,10,10,true);
	}
    #[test]
	fn lands_on_existing() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_move(test_code, expected,20,usize::MAX,5,10,true);
	}
    #[test]
	fn zero_step() {
		let test_code = "10 HOME\n20 PRINT X\n30 END";
		let expected = "";
		super::test_move(test_code, expected,20,usize::MAX,100,0,true);
	}
}

mod gather_cases {
    #[test]
	fn primary_nums() {
		let test_code = "10 HOME\n20 PRINT hello\n30 GOTO 1000";
		let mut renumberer = super::Renumberer::new();
		let nums = renumberer.get_primary_nums(test_code).expect("gather failed");
		assert_eq!(nums,vec![10,20,30]);
	}
}
